//! # Zeleznik Parameter Database
//!
//! ## Aim
//! Holds the temperature-dependent interaction coefficients of the Zeleznik correlation for the
//! binary system acid (species 1, `Species::A`) + water (species 2, `Species::B`).
//! Two coefficient families are stored:
//! - `Family::Interaction` (μ_jki) - symmetric in the summation indices j and k
//! - `Family::LogInteraction` (ε_jki) - weights the mole-fraction logarithm, NOT symmetric
//!
//! ## Lookup rules
//! - interaction family: (j,k,i), then (k,j,i), then the all-zero set
//! - log-interaction family: (j,k,i), then the all-zero set
//!
//! A coefficient absent from the table contributes nothing. Lookups never fail.
//!
//! ## Table format
//! ```json
//! {
//!   "version": "zeleznik-1991-table6-r1",
//!   "mu":  { "111": [c0, c1, c2, c3, c4], ... },
//!   "eps": { "121": [c0, c1, c2, c3, c4], ... }
//! }
//! ```
//! keys are "jki" digit strings, 1 = acid, 2 = water; coefficients multiply 1, T, T^2, 1/T, ln(T).
//!
//! ## Usage
//! ```rust, ignore
//! let db = ParameterDatabase::seed()?;
//! let mu_111 = db.value(Family::Interaction, Species::A, Species::A, Species::A, 298.15)?;
//! ```
use crate::Thermodynamics::DBhandlers::basis::evaluate;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use log::{debug, info};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// seed coefficient table, versioned as a single artifact
const SEED_TABLE: &str = include_str!("zeleznik_table6.json");

static SEED_DB: OnceLock<Result<ParameterDatabase, String>> = OnceLock::new();

#[derive(Debug)]
pub enum ParamError {
    WrongArity { key: Option<String>, found: usize },
    InvalidKey(String),
    AsymmetricInteraction { key: String, mirror: String },
    DeserializationError(String),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamError::WrongArity { key, found } => match key {
                Some(key) => write!(
                    f,
                    "Coefficient set '{}' must have exactly 5 coefficients, found {}",
                    key, found
                ),
                None => write!(
                    f,
                    "Coefficient set must have exactly 5 coefficients, found {}",
                    found
                ),
            },
            ParamError::InvalidKey(key) => {
                write!(
                    f,
                    "Invalid parameter key '{}': expected three digits from {{1, 2}} in jki order",
                    key
                )
            }
            ParamError::AsymmetricInteraction { key, mirror } => {
                write!(
                    f,
                    "Interaction coefficients '{}' and '{}' must be equal (mu_jki = mu_kji)",
                    key, mirror
                )
            }
            ParamError::DeserializationError(msg) => {
                write!(f, "Failed to deserialize parameter table: {}", msg)
            }
        }
    }
}

impl Error for ParamError {}

impl From<ParamError> for ZeleznikError {
    fn from(err: ParamError) -> Self {
        ZeleznikError::Configuration(err.to_string())
    }
}

/// the two components of the mixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// solute (acid), index 1 in the literature tables
    A,
    /// solvent (water), index 2 in the literature tables
    B,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::A, Species::B];

    /// index used in the literature tables
    pub fn index(&self) -> usize {
        match self {
            Species::A => 1,
            Species::B => 2,
        }
    }

    pub fn other(&self) -> Species {
        match self {
            Species::A => Species::B,
            Species::B => Species::A,
        }
    }

    fn from_digit(c: char) -> Option<Species> {
        match c {
            '1' => Some(Species::A),
            '2' => Some(Species::B),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Family {
    /// μ_jki
    Interaction,
    /// ε_jki
    LogInteraction,
}

/// (j, k, i): summation indices j, k and the outer species index i
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterKey {
    pub j: Species,
    pub k: Species,
    pub i: Species,
}

impl ParameterKey {
    pub fn new(j: Species, k: Species, i: Species) -> Self {
        Self { j, k, i }
    }
    /// the same coefficient with j and k swapped
    pub fn mirrored(&self) -> Self {
        Self {
            j: self.k,
            k: self.j,
            i: self.i,
        }
    }
    /// all 8 keys over {A, B}^3
    pub fn all() -> Vec<ParameterKey> {
        let mut keys = Vec::with_capacity(8);
        for i in Species::ALL {
            for j in Species::ALL {
                for k in Species::ALL {
                    keys.push(ParameterKey::new(j, k, i));
                }
            }
        }
        keys
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.j.index(), self.k.index(), self.i.index())
    }
}

impl FromStr for ParameterKey {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let species: Vec<Species> = s.trim().chars().filter_map(Species::from_digit).collect();
        if species.len() != 3 || s.trim().chars().count() != 3 {
            return Err(ParamError::InvalidKey(s.to_string()));
        }
        Ok(ParameterKey::new(species[0], species[1], species[2]))
    }
}

/// coefficients of c0 + c1*T + c2*T^2 + c3/T + c4*ln(T)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet(pub [f64; 5]);

impl ParameterSet {
    pub const ZERO: ParameterSet = ParameterSet([0.0; 5]);

    pub fn from_slice(coeffs: &[f64]) -> Result<Self, ParamError> {
        let arr: [f64; 5] = coeffs.try_into().map_err(|_| ParamError::WrongArity {
            key: None,
            found: coeffs.len(),
        })?;
        Ok(ParameterSet(arr))
    }

    pub fn coeffs(&self) -> &[f64; 5] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        ParameterSet::ZERO
    }
}

/// raw table as it is stored on disk
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParameterTableInput {
    pub version: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub mu: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub eps: BTreeMap<String, Vec<f64>>,
}

/// immutable after construction; share by reference
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDatabase {
    version: String,
    source: Option<String>,
    mu: BTreeMap<ParameterKey, ParameterSet>,
    eps: BTreeMap<ParameterKey, ParameterSet>,
}

impl ParameterDatabase {
    /// builds the database from already parsed keys; checks arity and μ symmetry
    pub fn from_entries(
        version: &str,
        mu: Vec<(ParameterKey, Vec<f64>)>,
        eps: Vec<(ParameterKey, Vec<f64>)>,
    ) -> Result<Self, ParamError> {
        let to_map = |entries: Vec<(ParameterKey, Vec<f64>)>| {
            entries
                .into_iter()
                .map(|(key, coeffs)| {
                    ParameterSet::from_slice(&coeffs)
                        .map(|set| (key, set))
                        .map_err(|_| ParamError::WrongArity {
                            key: Some(key.to_string()),
                            found: coeffs.len(),
                        })
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
        };
        let mu = to_map(mu)?;
        let eps = to_map(eps)?;
        for (key, set) in &mu {
            let mirror = key.mirrored();
            if let Some(mirror_set) = mu.get(&mirror) {
                if mirror_set != set {
                    return Err(ParamError::AsymmetricInteraction {
                        key: key.to_string(),
                        mirror: mirror.to_string(),
                    });
                }
            }
        }
        Ok(Self {
            version: version.to_string(),
            source: None,
            mu,
            eps,
        })
    }

    pub fn from_input(input: ParameterTableInput) -> Result<Self, ParamError> {
        let parse = |raw: BTreeMap<String, Vec<f64>>| {
            raw.into_iter()
                .map(|(k, v)| ParameterKey::from_str(&k).map(|key| (key, v)))
                .collect::<Result<Vec<_>, _>>()
        };
        let mut db = Self::from_entries(&input.version, parse(input.mu)?, parse(input.eps)?)?;
        db.source = input.source;
        Ok(db)
    }

    /// takes serde Value and parses it into the database
    pub fn from_serde(serde: Value) -> Result<Self, ParamError> {
        let input: ParameterTableInput = serde_json::from_value(serde)
            .map_err(|e| ParamError::DeserializationError(e.to_string()))?;
        Self::from_input(input)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ParamError> {
        let input: ParameterTableInput = serde_json::from_str(s)
            .map_err(|e| ParamError::DeserializationError(e.to_string()))?;
        Self::from_input(input)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ZeleznikResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let db = Self::from_json_str(&content)?;
        info!(
            "Loaded parameter table '{}' from '{}' ({} mu, {} eps entries)",
            db.version,
            path.display(),
            db.mu.len(),
            db.eps.len()
        );
        Ok(db)
    }

    /// process-wide seed table, parsed once
    pub fn seed() -> ZeleznikResult<&'static ParameterDatabase> {
        SEED_DB
            .get_or_init(|| {
                let db = ParameterDatabase::from_json_str(SEED_TABLE).map_err(|e| e.to_string());
                if let Ok(db) = &db {
                    debug!("seed parameter table '{}' parsed", db.version);
                }
                db
            })
            .as_ref()
            .map_err(|e| ZeleznikError::Configuration(e.clone()))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn table(&self, family: Family) -> &BTreeMap<ParameterKey, ParameterSet> {
        match family {
            Family::Interaction => &self.mu,
            Family::LogInteraction => &self.eps,
        }
    }

    /// explicitly listed entries of one family
    pub fn entries(&self, family: Family) -> impl Iterator<Item = (&ParameterKey, &ParameterSet)> {
        self.table(family).iter()
    }

    pub fn lookup(&self, family: Family, j: Species, k: Species, i: Species) -> ParameterSet {
        let key = ParameterKey::new(j, k, i);
        let table = self.table(family);
        if let Some(set) = table.get(&key) {
            return *set;
        }
        match family {
            Family::Interaction => table.get(&key.mirrored()).copied().unwrap_or_default(),
            Family::LogInteraction => ParameterSet::ZERO,
        }
    }

    /// coefficient value at temperature t
    pub fn value(
        &self,
        family: Family,
        j: Species,
        k: Species,
        i: Species,
        t: f64,
    ) -> ZeleznikResult<f64> {
        evaluate(&self.lookup(family, j, k, i), t)
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["family", "jki", "c0", "c1 (T)", "c2 (T^2)", "c3 (1/T)", "c4 (ln T)"]);
        for (family, name) in [(Family::Interaction, "mu"), (Family::LogInteraction, "eps")] {
            for (key, set) in self.entries(family) {
                let c = set.coeffs();
                table.add_row(row![
                    name,
                    key.to_string(),
                    format!("{:.6e}", c[0]),
                    format!("{:.6e}", c[1]),
                    format!("{:.6e}", c[2]),
                    format!("{:.6e}", c[3]),
                    format!("{:.6e}", c[4])
                ]);
            }
        }
        table
    }

    pub fn pretty_print(&self) {
        println!("Parameter table {}", self.version);
        if let Some(source) = &self.source {
            println!("source: {}", source);
        }
        self.to_table().printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Species::{A, B};
    use serde_json::json;

    #[test]
    fn test_seed_loads() {
        let db = ParameterDatabase::seed().unwrap();
        assert_eq!(db.version(), "zeleznik-1991-table6-r1");
        assert_eq!(db.entries(Family::Interaction).count(), 4);
        assert_eq!(db.entries(Family::LogInteraction).count(), 6);
    }

    #[test]
    fn test_seed_mu_111() {
        let db = ParameterDatabase::seed().unwrap();
        let set = db.lookup(Family::Interaction, A, A, A);
        assert_eq!(
            set,
            ParameterSet([
                -23.5245033870,
                0.0406889449841,
                -0.0000151369362907,
                2961.44445015,
                0.492476973663
            ])
        );
    }

    #[test]
    fn test_interaction_symmetry() {
        let db = ParameterDatabase::seed().unwrap();
        for key in ParameterKey::all() {
            assert_eq!(
                db.lookup(Family::Interaction, key.j, key.k, key.i),
                db.lookup(Family::Interaction, key.k, key.j, key.i),
                "mu_{} is not symmetric",
                key
            );
        }
        // 211 is only listed as 121
        assert!(!db.lookup(Family::Interaction, B, A, A).is_zero());
        assert!(!db.lookup(Family::Interaction, B, A, B).is_zero());
    }

    #[test]
    fn test_log_interaction_not_symmetric() {
        let db = ParameterDatabase::seed().unwrap();
        assert_ne!(
            db.lookup(Family::LogInteraction, A, B, A),
            db.lookup(Family::LogInteraction, B, A, A)
        );
    }

    #[test]
    fn test_missing_keys_default_to_zero() {
        let db = ParameterDatabase::seed().unwrap();
        for family in [Family::Interaction, Family::LogInteraction] {
            assert_eq!(db.lookup(family, A, A, B), ParameterSet::ZERO);
            assert_eq!(db.lookup(family, B, B, B), ParameterSet::ZERO);
        }
        assert_eq!(db.value(Family::LogInteraction, B, B, B, 300.0).unwrap(), 0.0);
    }

    #[test]
    fn test_log_interaction_no_mirror_fallback() {
        let key = ParameterKey::new(A, B, A);
        let db = ParameterDatabase::from_entries(
            "test",
            vec![],
            vec![(key, vec![1.0, 0.0, 0.0, 0.0, 0.0])],
        )
        .unwrap();
        assert_eq!(db.lookup(Family::LogInteraction, B, A, A), ParameterSet::ZERO);
        assert_eq!(db.lookup(Family::LogInteraction, A, B, A).0[0], 1.0);
    }

    #[test]
    fn test_wrong_arity_fails() {
        let result = ParameterDatabase::from_serde(json!({
            "version": "bad",
            "mu": { "111": [1.0, 2.0, 3.0] }
        }));
        assert!(matches!(
            result,
            Err(ParamError::WrongArity { ref key, found: 3 }) if key.as_deref() == Some("111")
        ));
        let err: ZeleznikError = result.unwrap_err().into();
        assert!(matches!(err, ZeleznikError::Configuration(_)));
    }

    #[test]
    fn test_invalid_key_fails() {
        let result = ParameterDatabase::from_serde(json!({
            "version": "bad",
            "eps": { "131": [1.0, 2.0, 3.0, 4.0, 5.0] }
        }));
        assert!(matches!(result, Err(ParamError::InvalidKey(k)) if k == "131"));
        assert!(ParameterKey::from_str("1212").is_err());
        assert!(ParameterKey::from_str("12").is_err());
    }

    #[test]
    fn test_asymmetric_interaction_rejected() {
        let result = ParameterDatabase::from_serde(json!({
            "version": "bad",
            "mu": {
                "121": [1.0, 0.0, 0.0, 0.0, 0.0],
                "211": [2.0, 0.0, 0.0, 0.0, 0.0]
            }
        }));
        assert!(matches!(
            result,
            Err(ParamError::AsymmetricInteraction { .. })
        ));
        // duplicated but equal entries are accepted
        let result = ParameterDatabase::from_serde(json!({
            "version": "ok",
            "mu": {
                "121": [1.0, 0.0, 0.0, 0.0, 0.0],
                "211": [1.0, 0.0, 0.0, 0.0, 0.0]
            }
        }));
        assert!(result.is_ok());
    }

    #[test]
    fn test_key_display_roundtrip() {
        for key in ParameterKey::all() {
            assert_eq!(ParameterKey::from_str(&key.to_string()).unwrap(), key);
        }
        assert_eq!(ParameterKey::new(B, A, B).to_string(), "212");
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SEED_TABLE.as_bytes()).unwrap();
        let db = ParameterDatabase::from_file(file.path()).unwrap();
        assert_eq!(&db, ParameterDatabase::seed().unwrap());
        assert!(db.source().unwrap().contains("Zeleznik"));
    }
}
