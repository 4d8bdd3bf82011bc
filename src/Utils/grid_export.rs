//! # Grid export
//!
//! Enumerates a temperature (°C) × concentration (wt % solute) grid, converts the concentration to
//! a mole fraction and writes the partial molar value of the solvent for every cell as CSV:
//!
//! `Temperature_C,Temperature_K,Wt_Solute,MoleFraction_Solute,PartialMolarValue`
//!
//! Temperature rows are computed in parallel, a batch at a time, and written in grid order as soon
//! as their batch is done, so the whole grid is never held in memory.
use crate::Thermodynamics::DBhandlers::ZeleznikParams::Species;
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use crate::Thermodynamics::ExcessFunctions::partial_molar::PartialMolarExtractor;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use crate::Utils::composition_units::MolarMasses;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADER: &str =
    "Temperature_C,Temperature_K,Wt_Solute,MoleFraction_Solute,PartialMolarValue";
pub const KELVIN_OFFSET: f64 = 273.15;
const PROGRESS_EVERY: usize = 10_000;

/// points per axis above which a grid is refused
const MAX_AXIS_POINTS: f64 = 1e8;

/// inclusive range start..=end with a fixed step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Range {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    fn validate(&self, name: &str) -> ZeleznikResult<()> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return Err(ZeleznikError::configuration(format!(
                "{} range must be finite",
                name
            )));
        }
        if self.step <= 0.0 {
            return Err(ZeleznikError::configuration(format!(
                "{} step must be positive, got {}",
                name, self.step
            )));
        }
        if self.end < self.start {
            return Err(ZeleznikError::configuration(format!(
                "{} range end {} is below start {}",
                name, self.end, self.start
            )));
        }
        let points = ((self.end - self.start) / self.step).round() + 1.0;
        if !points.is_finite() || points > MAX_AXIS_POINTS {
            return Err(ZeleznikError::configuration(format!(
                "{} range {}..={} with step {} has too many points",
                name, self.start, self.end, self.step
            )));
        }
        Ok(())
    }

    /// round((end - start) / step) + 1, meaningful for a validated range
    pub fn len(&self) -> usize {
        ((self.end - self.start) / self.step).round() as usize + 1
    }

    pub fn value(&self, n: usize) -> f64 {
        self.start + n as f64 * self.step
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.len()).map(|n| self.value(n)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// °C
    pub temperature: Range,
    /// wt % solute
    pub concentration: Range,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            temperature: Range::new(-20.0, 75.0, 0.1),
            concentration: Range::new(50.0, 99.9, 0.1),
        }
    }
}

impl GridSpec {
    pub fn new(temperature: Range, concentration: Range) -> Self {
        Self {
            temperature,
            concentration,
        }
    }

    pub fn validate(&self) -> ZeleznikResult<()> {
        self.temperature.validate("temperature")?;
        self.concentration.validate("concentration")?;
        let t_min = self.temperature.start + KELVIN_OFFSET;
        if t_min <= 0.0 {
            return Err(ZeleznikError::domain(format!(
                "grid starts at {} K, temperature must be positive",
                t_min
            )));
        }
        let wt_max = self.concentration.value(self.concentration.len() - 1);
        if self.concentration.start < 0.0 || wt_max > 100.0 + 1e-9 {
            return Err(ZeleznikError::domain(format!(
                "concentration grid [{}, {}] leaves [0, 100] wt %",
                self.concentration.start, wt_max
            )));
        }
        Ok(())
    }

    pub fn cells(&self) -> ZeleznikResult<usize> {
        self.temperature
            .len()
            .checked_mul(self.concentration.len())
            .ok_or_else(|| ZeleznikError::configuration("grid has too many cells"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRow {
    pub t_c: f64,
    pub t_k: f64,
    pub wt: f64,
    pub x_acid: f64,
    pub value: f64,
}

impl GridRow {
    pub fn to_csv(&self) -> String {
        format!(
            "{:.1},{:.2},{:.1},{:.6},{:.6}",
            self.t_c, self.t_k, self.wt, self.x_acid, self.value
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub temperatures: usize,
    pub concentrations: usize,
    pub rows: usize,
}

pub struct GridExporter<'a> {
    extractor: PartialMolarExtractor<'a>,
    variant: ModelVariant,
    masses: MolarMasses,
}

impl<'a> GridExporter<'a> {
    pub fn new(extractor: PartialMolarExtractor<'a>, variant: ModelVariant) -> Self {
        Self {
            extractor,
            variant,
            masses: MolarMasses::default(),
        }
    }

    pub fn with_masses(mut self, masses: MolarMasses) -> Self {
        self.masses = masses;
        self
    }

    /// all cells of one temperature row, in concentration order
    pub fn row(&self, t_c: f64, concentration: &Range) -> ZeleznikResult<Vec<GridRow>> {
        let t_k = t_c + KELVIN_OFFSET;
        let slice = self.extractor.slice(t_k)?;
        concentration
            .values()
            .into_iter()
            .map(|wt| {
                // last grid value may overshoot 100 by rounding
                let wt = wt.min(100.0);
                let x_acid = self.masses.wt_to_mole_fraction(wt)?;
                let value =
                    self.extractor
                        .partial_molar_in_slice(&slice, Species::B, x_acid, &self.variant)?;
                Ok(GridRow {
                    t_c,
                    t_k,
                    wt,
                    x_acid,
                    value,
                })
            })
            .collect()
    }

    pub fn export<W: Write>(&self, grid: &GridSpec, out: &mut W) -> ZeleznikResult<ExportSummary> {
        grid.validate()?;
        let temperatures = grid.temperature.values();
        let total = grid.cells()?;
        info!(
            "Exporting {} x {} grid ({} rows) for variant {}",
            temperatures.len(),
            grid.concentration.len(),
            total,
            self.variant
        );
        writeln!(out, "{}", CSV_HEADER)?;
        let batch = rayon::current_num_threads().max(1);
        let mut written = 0;
        let mut next_report = PROGRESS_EVERY;
        for chunk in temperatures.chunks(batch) {
            let rows = chunk
                .par_iter()
                .map(|t_c| self.row(*t_c, &grid.concentration))
                .collect::<ZeleznikResult<Vec<Vec<GridRow>>>>()?;
            for row in rows.iter().flatten() {
                writeln!(out, "{}", row.to_csv())?;
                written += 1;
            }
            if written >= next_report {
                info!("{} / {} rows written", written, total);
                next_report = (written / PROGRESS_EVERY + 1) * PROGRESS_EVERY;
            }
        }
        out.flush()?;
        info!("Export finished: {} rows", written);
        Ok(ExportSummary {
            temperatures: temperatures.len(),
            concentrations: grid.concentration.len(),
            rows: written,
        })
    }

    pub fn export_to_file(
        &self,
        grid: &GridSpec,
        path: impl AsRef<Path>,
    ) -> ZeleznikResult<ExportSummary> {
        let path = path.as_ref();
        grid.validate()?;
        let mut out = BufWriter::new(File::create(path)?);
        let summary = self.export(grid, &mut out)?;
        info!("Saved grid to '{}'", path.display());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::DBhandlers::ZeleznikParams::ParameterDatabase;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    fn exporter() -> GridExporter<'static> {
        let db = ParameterDatabase::seed().unwrap();
        GridExporter::new(PartialMolarExtractor::new(db), ModelVariant::default())
    }

    fn small_grid() -> GridSpec {
        GridSpec::new(Range::new(0.0, 0.1, 0.1), Range::new(50.0, 50.1, 0.1))
    }

    fn export_string(grid: &GridSpec) -> (ExportSummary, String) {
        let mut buf = Vec::new();
        let summary = exporter().export(grid, &mut buf).unwrap();
        (summary, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_range_len() {
        assert_eq!(Range::new(0.0, 0.1, 0.1).len(), 2);
        assert_eq!(Range::new(0.0, 100.0, 0.1).len(), 1001);
        assert_eq!(Range::new(5.0, 5.0, 1.0).len(), 1);
        assert_eq!(Range::new(0.0, 1.0, 0.3).len(), 4);
    }

    #[test]
    fn test_default_grid() {
        let grid = GridSpec::default();
        grid.validate().unwrap();
        assert_eq!(grid.temperature.len(), 951);
        assert_eq!(grid.concentration.len(), 500);
        assert_eq!(grid.cells().unwrap(), 951 * 500);
        assert_relative_eq!(grid.temperature.value(0), -20.0);
        assert_relative_eq!(grid.temperature.value(950), 75.0, epsilon = 1e-9);
        assert_relative_eq!(grid.concentration.value(0), 50.0);
        assert_relative_eq!(grid.concentration.value(499), 99.9, epsilon = 1e-9);
    }

    #[test]
    fn test_tiny_step_refused() {
        let grid = GridSpec::new(Range::new(0.0, 1.0, 1.0), Range::new(0.0, 100.0, 1e-300));
        assert!(matches!(
            grid.validate(),
            Err(ZeleznikError::Configuration(_))
        ));
        let mut out = Vec::new();
        assert!(matches!(
            exporter().export(&grid, &mut out),
            Err(ZeleznikError::Configuration(_))
        ));
        assert!(out.is_empty());
        let wide = GridSpec::new(Range::new(0.0, 1e9, 1.0), Range::new(0.0, 1.0, 1.0));
        assert!(matches!(
            wide.validate(),
            Err(ZeleznikError::Configuration(_))
        ));
    }

    #[test]
    fn test_four_rows() {
        let (summary, text) = export_string(&small_grid());
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.temperatures, 2);
        assert_eq!(summary.concentrations, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("0.0,273.15,50.0,0.155178,"));
        assert!(lines[2].starts_with("0.0,273.15,50.1,"));
        assert!(lines[3].starts_with("0.1,273.25,50.0,0.155178,"));
        for line in &lines[1..] {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 5);
            assert!(fields[4].parse::<f64>().unwrap().is_finite());
        }
    }

    #[test]
    fn test_reproducible() {
        let (_, a) = export_string(&small_grid());
        let (_, b) = export_string(&small_grid());
        assert_eq!(a, b);
    }

    #[test]
    fn test_row_order_matches_grid() {
        let grid = GridSpec::new(Range::new(0.0, 30.0, 2.0), Range::new(10.0, 20.0, 5.0));
        let (summary, text) = export_string(&grid);
        assert_eq!(summary.rows, 16 * 3);
        let temps: Vec<f64> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap().parse().unwrap())
            .collect();
        for pair in temps.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_export_to_file() {
        let file = NamedTempFile::new().unwrap();
        let summary = exporter().export_to_file(&small_grid(), file.path()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.lines().count(), summary.rows + 1);
    }

    #[test]
    fn test_bad_grids() {
        let mut out = Vec::new();
        let backwards = GridSpec::new(Range::new(10.0, 0.0, 1.0), Range::new(0.0, 10.0, 1.0));
        assert!(matches!(
            exporter().export(&backwards, &mut out),
            Err(ZeleznikError::Configuration(_))
        ));
        let cold = GridSpec::new(Range::new(-300.0, 0.0, 1.0), Range::new(0.0, 10.0, 1.0));
        assert!(matches!(
            exporter().export(&cold, &mut out),
            Err(ZeleznikError::Domain(_))
        ));
        let zero_step = GridSpec::new(Range::new(0.0, 1.0, 0.0), Range::new(0.0, 10.0, 1.0));
        assert!(exporter().export(&zero_step, &mut out).is_err());
    }

    #[test]
    fn test_custom_masses() {
        let masses = MolarMasses::new(1.0, 1.0).unwrap();
        let rows = exporter()
            .with_masses(masses)
            .row(25.0, &Range::new(50.0, 50.0, 1.0))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].x_acid, 0.5);
        assert_eq!(rows[0].t_k, 298.15);
    }
}
