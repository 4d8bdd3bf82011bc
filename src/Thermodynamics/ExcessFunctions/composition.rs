use crate::Thermodynamics::DBhandlers::ZeleznikParams::Species;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};

/// ln(x) is replaced by this value when x <= LN_FLOOR_THRESHOLD
pub const LN_FLOOR: f64 = -115.0;
pub const LN_FLOOR_THRESHOLD: f64 = 1e-50;

/// logarithm of a mole fraction, finite at x = 0
pub fn safe_ln(x: f64) -> f64 {
    if x > LN_FLOOR_THRESHOLD { x.ln() } else { LN_FLOOR }
}

/// mole fractions (x_A, x_B) of acid and water, x_A + x_B = 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    x_a: f64,
    x_b: f64,
}

impl Composition {
    /// composition from the solute mole fraction
    pub fn from_solute(x_a: f64) -> ZeleznikResult<Self> {
        check_fraction("x_A", x_a)?;
        Ok(Self {
            x_a,
            x_b: 1.0 - x_a,
        })
    }

    pub fn new(x_a: f64, x_b: f64) -> ZeleznikResult<Self> {
        check_fraction("x_A", x_a)?;
        check_fraction("x_B", x_b)?;
        if (x_a + x_b - 1.0).abs() > 1e-12 {
            return Err(ZeleznikError::domain(format!(
                "mole fractions must sum to 1, got x_A = {}, x_B = {}",
                x_a, x_b
            )));
        }
        Ok(Self { x_a, x_b })
    }

    pub fn x_a(&self) -> f64 {
        self.x_a
    }

    pub fn x_b(&self) -> f64 {
        self.x_b
    }

    pub fn x(&self, species: Species) -> f64 {
        match species {
            Species::A => self.x_a,
            Species::B => self.x_b,
        }
    }

    pub fn ln_x(&self, species: Species) -> f64 {
        safe_ln(self.x(species))
    }
}

fn check_fraction(name: &str, x: f64) -> ZeleznikResult<()> {
    if !x.is_finite() || !(0.0..=1.0).contains(&x) {
        return Err(ZeleznikError::domain(format!(
            "mole fraction {} must lie in [0, 1], got {}",
            name, x
        )));
    }
    Ok(())
}
