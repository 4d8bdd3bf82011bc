//! # Settings Module
//!
//! ## Purpose
//! Keeps every tunable of a calculation in one JSON file (`zeleznik_config.json` by default) so
//! that calibration runs and grid exports are reproducible without recompiling.
//!
//! ## Architecture
//! - **CalculationConfig**: serializable configuration, every field has a default
//! - **ConfigManager**: loads, validates and saves the configuration, and builds the objects the
//!   calculation needs (parameter database, reference points, offset interpolant)
//!
//! ## Configuration Format
//! ```json
//! {
//!   "parameter_table": null,
//!   "derivative_step": 1e-7,
//!   "reference_temperature": 298.15,
//!   "variant": "solute_only/j/raw",
//!   "candidate_variants": ["solute_only/j/raw", "asym/k/raw"],
//!   "rms_threshold": null,
//!   "offset_anchors": [[250.0, 0.2871], [298.15, 0.0], [350.0, 0.3845]],
//!   "reference_points": null,
//!   "grid": {
//!     "temperature": {"start": -20.0, "end": 75.0, "step": 0.1},
//!     "concentration": {"start": 50.0, "end": 99.9, "step": 0.1}
//!   },
//!   "output_file": "zeleznik_grid.csv"
//! }
//! ```
//! Missing fields take their default values. A file that exists but cannot be parsed is an error.

use crate::Calibration::offset_fit::{OffsetFunction, fit_offset};
use crate::Calibration::reference_data::{
    ReferencePoint, load_reference_points, pure_water_anchors, table7,
};
use crate::Thermodynamics::DBhandlers::ZeleznikParams::ParameterDatabase;
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use crate::Thermodynamics::ExcessFunctions::partial_molar::DEFAULT_STEP;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use crate::Utils::grid_export::GridSpec;
use log::info;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "zeleznik_config.json";

/// Parameters of a calibration or export run.
///
/// # Fields
/// * `parameter_table` - JSON coefficient table replacing the embedded one
/// * `derivative_step` - finite difference step in mole fraction
/// * `reference_temperature` - K, used by single-temperature reports
/// * `variant` - model variant used for export
/// * `candidate_variants` - variants compared by the sweep
/// * `rms_threshold` - RMS above which a variant is flagged, none by default
/// * `offset_anchors` - (T, value) pairs of the offset interpolant
/// * `reference_points` - JSON file of reference points replacing the built-in tables
/// * `grid`, `output_file` - grid export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    pub parameter_table: Option<String>,
    pub derivative_step: f64,
    pub reference_temperature: f64,
    pub variant: ModelVariant,
    pub candidate_variants: Vec<ModelVariant>,
    pub rms_threshold: Option<f64>,
    pub offset_anchors: Vec<(f64, f64)>,
    pub reference_points: Option<String>,
    pub grid: GridSpec,
    pub output_file: String,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            parameter_table: None,
            derivative_step: DEFAULT_STEP,
            reference_temperature: 298.15,
            variant: ModelVariant::default(),
            candidate_variants: ModelVariant::catalog(false),
            rms_threshold: None,
            offset_anchors: pure_water_anchors(),
            reference_points: None,
            grid: GridSpec::default(),
            output_file: "zeleznik_grid.csv".to_string(),
        }
    }
}

impl CalculationConfig {
    /// Checks the values that can be checked without touching other files.
    pub fn validate(&self) -> ZeleznikResult<()> {
        if !self.derivative_step.is_finite()
            || self.derivative_step <= 0.0
            || self.derivative_step >= 0.5
        {
            return Err(ZeleznikError::configuration(format!(
                "derivative_step must lie in (0, 0.5), got {}",
                self.derivative_step
            )));
        }
        if !self.reference_temperature.is_finite() || self.reference_temperature <= 0.0 {
            return Err(ZeleznikError::configuration(format!(
                "reference_temperature must be positive, got {}",
                self.reference_temperature
            )));
        }
        if self.candidate_variants.is_empty() {
            return Err(ZeleznikError::configuration(
                "candidate_variants must not be empty",
            ));
        }
        if let Some(threshold) = self.rms_threshold
            && (!threshold.is_finite() || threshold < 0.0)
        {
            return Err(ZeleznikError::configuration(format!(
                "rms_threshold must be non-negative, got {}",
                threshold
            )));
        }
        if self.offset_anchors.is_empty() {
            return Err(ZeleznikError::configuration(
                "offset_anchors must hold at least one (T, value) pair",
            ));
        }
        if self.output_file.trim().is_empty() {
            return Err(ZeleznikError::configuration("output_file is empty"));
        }
        self.grid.validate()
    }
}

/// Owner of the configuration and of the file it is persisted to.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: CalculationConfig,
    config_file: String,
}

impl ConfigManager {
    /// Reads `zeleznik_config.json` from the working directory, defaults if it does not exist.
    pub fn new() -> ZeleznikResult<Self> {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// Reads a configuration from `config_file`, defaults if it does not exist.
    pub fn with_config_file(config_file: &str) -> ZeleznikResult<Self> {
        let config = Self::load_config(config_file)?;
        Ok(Self {
            config,
            config_file: config_file.to_string(),
        })
    }

    pub fn from_config(config: CalculationConfig, config_file: &str) -> ZeleznikResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            config_file: config_file.to_string(),
        })
    }

    fn load_config(config_file: &str) -> ZeleznikResult<CalculationConfig> {
        if !Path::new(config_file).exists() {
            info!("No configuration file '{}', using defaults", config_file);
            return Ok(CalculationConfig::default());
        }
        let content = fs::read_to_string(config_file)?;
        let config: CalculationConfig = serde_json::from_str(&content).map_err(|e| {
            ZeleznikError::configuration(format!("malformed '{}': {}", config_file, e))
        })?;
        config.validate()?;
        info!("Loaded configuration from '{}'", config_file);
        Ok(config)
    }

    /// Writes the configuration as pretty JSON to the config file.
    pub fn save_config(&self) -> ZeleznikResult<()> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }

    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Replaces the configuration after validating it.
    pub fn update_config(&mut self, config: CalculationConfig) -> ZeleznikResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = CalculationConfig::default();
    }

    /// Coefficient table named by `parameter_table`, or the embedded one.
    pub fn database(&self) -> ZeleznikResult<Cow<'static, ParameterDatabase>> {
        match &self.config.parameter_table {
            Some(path) => Ok(Cow::Owned(ParameterDatabase::from_file(path)?)),
            None => Ok(Cow::Borrowed(ParameterDatabase::seed()?)),
        }
    }

    /// Points from `reference_points`, or the built-in literature tables.
    pub fn reference_points(&self) -> ZeleznikResult<Vec<ReferencePoint>> {
        match &self.config.reference_points {
            Some(path) => load_reference_points(path),
            None => Ok(table7().to_vec()),
        }
    }

    pub fn offset(&self) -> ZeleznikResult<OffsetFunction> {
        fit_offset(&self.config.offset_anchors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let config = CalculationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.derivative_step, 1e-7);
        assert_eq!(config.variant.to_string(), "solute_only/j/raw");
        assert_eq!(config.candidate_variants.len(), 21);
        assert_eq!(config.offset_anchors.len(), 3);
        assert_eq!(config.rms_threshold, None);
        let negative = CalculationConfig {
            rms_threshold: Some(-0.5),
            ..CalculationConfig::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ZeleznikError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let manager = ConfigManager::with_config_file(path.to_str().unwrap()).unwrap();
        assert_eq!(*manager.config(), CalculationConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"variant": "asym/k/ideal", "derivative_step": 1e-6,
                "offset_anchors": [[298.15, 0.0], [350.0, 0.3845]]}}"#
        )
        .unwrap();
        let manager = ConfigManager::with_config_file(file.path().to_str().unwrap()).unwrap();
        let config = manager.config();
        assert_eq!(config.variant, ModelVariant::from_str("asym/k/ideal").unwrap());
        assert_eq!(config.derivative_step, 1e-6);
        assert_eq!(config.reference_temperature, 298.15);
        assert_eq!(manager.offset().unwrap().degree(), 1);
    }

    #[test]
    fn test_malformed_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"variant": "wobbly/q"}}"#).unwrap();
        assert!(matches!(
            ConfigManager::with_config_file(file.path().to_str().unwrap()),
            Err(ZeleznikError::Configuration(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"derivative_step": 0.9}}"#).unwrap();
        assert!(matches!(
            ConfigManager::with_config_file(file.path().to_str().unwrap()),
            Err(ZeleznikError::Configuration(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(ConfigManager::with_config_file(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();
        let mut manager = ConfigManager::with_config_file(path).unwrap();
        let mut config = manager.config().clone();
        config.rms_threshold = Some(0.25);
        config.candidate_variants = vec![ModelVariant::from_str("product/i/raw").unwrap()];
        manager.update_config(config.clone()).unwrap();
        manager.save_config().unwrap();
        let reloaded = ConfigManager::with_config_file(path).unwrap();
        assert_eq!(*reloaded.config(), config);

        manager.reset_to_defaults();
        assert_eq!(*manager.config(), CalculationConfig::default());
    }

    #[test]
    fn test_update_rejects_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut manager = ConfigManager::with_config_file(path.to_str().unwrap()).unwrap();
        let config = CalculationConfig {
            candidate_variants: Vec::new(),
            ..CalculationConfig::default()
        };
        assert!(manager.update_config(config).is_err());
        assert_eq!(*manager.config(), CalculationConfig::default());
    }

    #[test]
    fn test_builds_collaborators() {
        let manager =
            ConfigManager::from_config(CalculationConfig::default(), DEFAULT_CONFIG_FILE).unwrap();
        let db = manager.database().unwrap();
        assert_eq!(db.version(), ParameterDatabase::seed().unwrap().version());
        assert_eq!(manager.reference_points().unwrap().len(), 13);
        assert_eq!(manager.offset().unwrap().degree(), 2);
    }

    #[test]
    fn test_external_parameter_table() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            include_str!("Thermodynamics/DBhandlers/zeleznik_table6.json")
        )
        .unwrap();
        let config = CalculationConfig {
            parameter_table: Some(file.path().to_str().unwrap().to_string()),
            ..CalculationConfig::default()
        };
        let manager = ConfigManager::from_config(config, DEFAULT_CONFIG_FILE).unwrap();
        let db = manager.database().unwrap();
        assert!(matches!(db, Cow::Owned(_)));
        assert_eq!(*db, *ParameterDatabase::seed().unwrap());
    }
}
