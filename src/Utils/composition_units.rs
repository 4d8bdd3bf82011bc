//! Conversion between weight percent and mole fraction of the solute in a binary mixture.
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use serde::{Deserialize, Serialize};

/// g/mol, H2SO4
pub const M_H2SO4: f64 = 98.079;
/// g/mol, H2O
pub const M_H2O: f64 = 18.01528;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MolarMasses {
    pub solute: f64,
    pub solvent: f64,
}

impl Default for MolarMasses {
    fn default() -> Self {
        Self {
            solute: M_H2SO4,
            solvent: M_H2O,
        }
    }
}

impl MolarMasses {
    pub fn new(solute: f64, solvent: f64) -> ZeleznikResult<Self> {
        for m in [solute, solvent] {
            if !m.is_finite() || m <= 0.0 {
                return Err(ZeleznikError::configuration(format!(
                    "molar mass must be positive, got {}",
                    m
                )));
            }
        }
        Ok(Self { solute, solvent })
    }

    /// mole fraction of the solute for `wt` percent solute by mass
    pub fn wt_to_mole_fraction(&self, wt: f64) -> ZeleznikResult<f64> {
        if !wt.is_finite() || !(0.0..=100.0).contains(&wt) {
            return Err(ZeleznikError::domain(format!(
                "weight percent must lie in [0, 100], got {}",
                wt
            )));
        }
        let n_solute = wt / self.solute;
        let n_solvent = (100.0 - wt) / self.solvent;
        Ok(n_solute / (n_solute + n_solvent))
    }

    pub fn mole_fraction_to_wt(&self, x: f64) -> ZeleznikResult<f64> {
        if !x.is_finite() || !(0.0..=1.0).contains(&x) {
            return Err(ZeleznikError::domain(format!(
                "mole fraction must lie in [0, 1], got {}",
                x
            )));
        }
        let m_solute = x * self.solute;
        let m_solvent = (1.0 - x) * self.solvent;
        Ok(100.0 * m_solute / (m_solute + m_solvent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_values() {
        let m = MolarMasses::default();
        assert_eq!(m.wt_to_mole_fraction(0.0).unwrap(), 0.0);
        assert_eq!(m.wt_to_mole_fraction(100.0).unwrap(), 1.0);
        assert_relative_eq!(
            m.wt_to_mole_fraction(50.0).unwrap(),
            0.155178,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_inverse() {
        let m = MolarMasses::default();
        for wt in [1.0, 25.0, 50.0, 75.0, 98.0] {
            let x = m.wt_to_mole_fraction(wt).unwrap();
            assert_relative_eq!(m.mole_fraction_to_wt(x).unwrap(), wt, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_out_of_range() {
        let m = MolarMasses::default();
        assert!(matches!(
            m.wt_to_mole_fraction(100.5),
            Err(ZeleznikError::Domain(_))
        ));
        assert!(matches!(
            m.mole_fraction_to_wt(-0.1),
            Err(ZeleznikError::Domain(_))
        ));
        assert!(MolarMasses::new(0.0, 18.0).is_err());
    }
}
