//! Literature reference values of the relative partial molar Gibbs energy of water, -μ2(r)/RT,
//! for aqueous sulfuric acid (Zeleznik 1991, Table 7), as used to calibrate model variants.
use crate::Thermodynamics::DBhandlers::basis::check_temperature;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// (x_acid, -μ2(r)/RT) at 298.15 K
const TABLE7_298: [(f64, f64); 10] = [
    (0.10, 0.4931),
    (0.20, 1.5753),
    (0.30, 3.0816),
    (0.40, 4.8016),
    (0.50, 6.8584),
    (0.60, 8.6533),
    (0.70, 10.0160),
    (0.80, 11.1347),
    (0.90, 12.2345),
    (0.98, 15.2470),
];

/// (x_acid, -μ2(r)/RT) at 350 K
const TABLE7_350: [(f64, f64); 3] = [(0.10, 0.5387), (0.50, 5.7337), (0.90, 10.7424)];

/// (T, -μ2(r)/RT at x_acid = 0)
const PURE_WATER_ANCHORS: [(f64, f64); 3] = [(250.0, 0.2871), (298.15, 0.0), (350.0, 0.3845)];

static TABLE7: OnceLock<Vec<ReferencePoint>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// mole fraction of the acid
    pub x_acid: f64,
    /// K
    pub temperature: f64,
    /// expected partial molar value
    pub value: f64,
}

impl ReferencePoint {
    pub fn new(x_acid: f64, temperature: f64, value: f64) -> Self {
        Self {
            x_acid,
            temperature,
            value,
        }
    }

    pub fn validate(&self) -> ZeleznikResult<()> {
        check_temperature(self.temperature)?;
        if !self.x_acid.is_finite() || !(0.0..=1.0).contains(&self.x_acid) {
            return Err(ZeleznikError::domain(format!(
                "reference point mole fraction must lie in [0, 1], got {}",
                self.x_acid
            )));
        }
        if !self.value.is_finite() {
            return Err(ZeleznikError::domain(format!(
                "reference value at x = {}, T = {} K is not finite",
                self.x_acid, self.temperature
            )));
        }
        Ok(())
    }
}

fn points_at(t: f64, table: &[(f64, f64)]) -> impl Iterator<Item = ReferencePoint> + '_ {
    table
        .iter()
        .map(move |(x, v)| ReferencePoint::new(*x, t, *v))
}

/// every built-in reference point, 298.15 K first
pub fn table7() -> &'static [ReferencePoint] {
    TABLE7.get_or_init(|| {
        points_at(298.15, &TABLE7_298)
            .chain(points_at(350.0, &TABLE7_350))
            .collect()
    })
}

pub fn table7_298() -> &'static [ReferencePoint] {
    &table7()[..TABLE7_298.len()]
}

pub fn table7_350() -> &'static [ReferencePoint] {
    &table7()[TABLE7_298.len()..]
}

/// reference points at temperature t (exact match)
pub fn at_temperature(points: &[ReferencePoint], t: f64) -> Vec<ReferencePoint> {
    points
        .iter()
        .filter(|p| (p.temperature - t).abs() < 1e-9)
        .copied()
        .collect()
}

/// pure-water values of the relative partial molar property, anchors of the offset interpolant
pub fn pure_water_anchors() -> Vec<(f64, f64)> {
    PURE_WATER_ANCHORS.to_vec()
}

/// reads a JSON array of {"x_acid", "temperature", "value"} records
pub fn load_reference_points(path: impl AsRef<Path>) -> ZeleznikResult<Vec<ReferencePoint>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let points: Vec<ReferencePoint> = serde_json::from_str(&content)?;
    for p in &points {
        p.validate()?;
    }
    info!(
        "Loaded {} reference points from '{}'",
        points.len(),
        path.display()
    );
    Ok(points)
}
