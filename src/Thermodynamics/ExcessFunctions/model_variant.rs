//! # Model variants
//!
//! The weighting function Φ(i) and the index whose mole-fraction logarithm enters the ε terms are
//! not settled by the published correlation. Every hypothesis is a first-class value here:
//!
//! | tag | Φ(A) | Φ(B) |
//! |-----|------|------|
//! | `solute_only` | 1 | 0 |
//! | `mole_ratio` | 1 | x_A/x_B (0 when x_B <= 1e-10) |
//! | `product` | 1 | x_A x_B |
//! | `asym` | 1 | x_A x_B (x_A - x_B) |
//! | `asym_flip` | 1 | x_A x_B (x_B - x_A) |
//! | `scaled_asym` | x_A x_B | x_A x_B (x_A - x_B) |
//! | `squared_solvent` | x_A x_B | x_A x_B^2 |
//!
//! A full variant is written `<policy>/<j|k|i>/<raw|ideal>`, e.g. `solute_only/j/raw`.
//! `ideal` means the partial molar property has ln(x) of the component subtracted.
use crate::Thermodynamics::DBhandlers::ZeleznikParams::Species;
use crate::Thermodynamics::ExcessFunctions::composition::Composition;
use crate::Thermodynamics::error::ZeleznikError;
use enum_dispatch::enum_dispatch;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static VARIANT_PATTERN: OnceLock<Result<Regex, String>> = OnceLock::new();

/// `<policy>/<j|k|i>[/<raw|ideal>]`, compiled once per process
fn variant_pattern() -> Result<&'static Regex, ZeleznikError> {
    VARIANT_PATTERN
        .get_or_init(|| {
            Regex::new(r"^\s*([A-Za-z_]+)\s*/\s*([A-Za-z])\s*(?:/\s*([A-Za-z]+)\s*)?$")
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| ZeleznikError::Configuration(e.clone()))
}

#[enum_dispatch]
pub trait WeightingFunction {
    /// Φ(species) at the given composition
    fn phi(&self, species: Species, x: &Composition) -> f64;
    fn tag(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoluteOnly;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoleRatio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryProduct;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asymmetric {
    /// Φ(B) = x_A x_B (x_B - x_A) instead of x_A x_B (x_A - x_B)
    pub flipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledAsymmetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquaredSolvent;

impl WeightingFunction for SoluteOnly {
    fn phi(&self, species: Species, _x: &Composition) -> f64 {
        match species {
            Species::A => 1.0,
            Species::B => 0.0,
        }
    }
    fn tag(&self) -> &'static str {
        "solute_only"
    }
}

impl WeightingFunction for MoleRatio {
    fn phi(&self, species: Species, x: &Composition) -> f64 {
        match species {
            Species::A => 1.0,
            Species::B => {
                if x.x_b() > 1e-10 {
                    x.x_a() / x.x_b()
                } else {
                    0.0
                }
            }
        }
    }
    fn tag(&self) -> &'static str {
        "mole_ratio"
    }
}

impl WeightingFunction for BinaryProduct {
    fn phi(&self, species: Species, x: &Composition) -> f64 {
        match species {
            Species::A => 1.0,
            Species::B => x.x_a() * x.x_b(),
        }
    }
    fn tag(&self) -> &'static str {
        "product"
    }
}

impl WeightingFunction for Asymmetric {
    fn phi(&self, species: Species, x: &Composition) -> f64 {
        match species {
            Species::A => 1.0,
            Species::B => {
                let phi = x.x_a() * x.x_b() * (x.x_a() - x.x_b());
                if self.flipped { -phi } else { phi }
            }
        }
    }
    fn tag(&self) -> &'static str {
        if self.flipped { "asym_flip" } else { "asym" }
    }
}

impl WeightingFunction for ScaledAsymmetric {
    fn phi(&self, species: Species, x: &Composition) -> f64 {
        let product = x.x_a() * x.x_b();
        match species {
            Species::A => product,
            Species::B => product * (x.x_a() - x.x_b()),
        }
    }
    fn tag(&self) -> &'static str {
        "scaled_asym"
    }
}

impl WeightingFunction for SquaredSolvent {
    fn phi(&self, species: Species, x: &Composition) -> f64 {
        let product = x.x_a() * x.x_b();
        match species {
            Species::A => product,
            Species::B => product * x.x_b(),
        }
    }
    fn tag(&self) -> &'static str {
        "squared_solvent"
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[enum_dispatch(WeightingFunction)]
pub enum WeightingPolicy {
    SoluteOnly(SoluteOnly),
    MoleRatio(MoleRatio),
    BinaryProduct(BinaryProduct),
    Asymmetric(Asymmetric),
    ScaledAsymmetric(ScaledAsymmetric),
    SquaredSolvent(SquaredSolvent),
}

impl WeightingPolicy {
    pub fn all() -> Vec<WeightingPolicy> {
        vec![
            SoluteOnly.into(),
            MoleRatio.into(),
            BinaryProduct.into(),
            Asymmetric { flipped: false }.into(),
            Asymmetric { flipped: true }.into(),
            ScaledAsymmetric.into(),
            SquaredSolvent.into(),
        ]
    }
}

impl FromStr for WeightingPolicy {
    type Err = ZeleznikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        WeightingPolicy::all()
            .into_iter()
            .find(|policy| policy.tag() == tag)
            .ok_or_else(|| {
                ZeleznikError::configuration(format!("unknown weighting policy '{}'", s))
            })
    }
}

/// which summation index supplies the logarithm in (μ + ε ln x) x_j x_k
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogIndex {
    J,
    K,
    I,
}

impl LogIndex {
    pub const ALL: [LogIndex; 3] = [LogIndex::J, LogIndex::K, LogIndex::I];

    pub fn select(&self, j: Species, k: Species, i: Species) -> Species {
        match self {
            LogIndex::J => j,
            LogIndex::K => k,
            LogIndex::I => i,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LogIndex::J => "j",
            LogIndex::K => "k",
            LogIndex::I => "i",
        }
    }
}

impl FromStr for LogIndex {
    type Err = ZeleznikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "j" => Ok(LogIndex::J),
            "k" => Ok(LogIndex::K),
            "i" => Ok(LogIndex::I),
            _ => Err(ZeleznikError::configuration(format!(
                "unknown log index '{}', expected j, k or i",
                s
            ))),
        }
    }
}

/// one hypothesis: weighting function, log index and normalization of the partial molar property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelVariant {
    pub weighting: WeightingPolicy,
    pub log_index: LogIndex,
    /// subtract ln(x) of the component from Q - x dQ/dx
    pub subtract_ideal: bool,
}

impl ModelVariant {
    pub fn new(weighting: WeightingPolicy, log_index: LogIndex, subtract_ideal: bool) -> Self {
        Self {
            weighting,
            log_index,
            subtract_ideal,
        }
    }

    /// every weighting policy combined with every log index
    pub fn catalog(subtract_ideal: bool) -> Vec<ModelVariant> {
        let mut variants = Vec::new();
        for weighting in WeightingPolicy::all() {
            for log_index in LogIndex::ALL {
                variants.push(ModelVariant::new(weighting, log_index, subtract_ideal));
            }
        }
        variants
    }

    pub fn phi(&self, species: Species, x: &Composition) -> f64 {
        self.weighting.phi(species, x)
    }
}

impl Default for ModelVariant {
    fn default() -> Self {
        ModelVariant::new(SoluteOnly.into(), LogIndex::J, false)
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.weighting.tag(),
            self.log_index.tag(),
            if self.subtract_ideal { "ideal" } else { "raw" }
        )
    }
}

impl FromStr for ModelVariant {
    type Err = ZeleznikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = variant_pattern()?.captures(s).ok_or_else(|| {
            ZeleznikError::configuration(format!(
                "malformed model variant '{}', expected <policy>/<j|k|i>[/<raw|ideal>]",
                s
            ))
        })?;
        let weighting = WeightingPolicy::from_str(&caps[1])?;
        let log_index = LogIndex::from_str(&caps[2])?;
        let subtract_ideal = match caps.get(3).map(|m| m.as_str().to_lowercase()) {
            None => false,
            Some(norm) if norm == "raw" => false,
            Some(norm) if norm == "ideal" => true,
            Some(norm) => {
                return Err(ZeleznikError::configuration(format!(
                    "unknown normalization '{}', expected raw or ideal",
                    norm
                )));
            }
        };
        Ok(ModelVariant::new(weighting, log_index, subtract_ideal))
    }
}

impl TryFrom<String> for ModelVariant {
    type Error = ZeleznikError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        ModelVariant::from_str(&s)
    }
}

impl From<ModelVariant> for String {
    fn from(variant: ModelVariant) -> Self {
        variant.to_string()
    }
}
