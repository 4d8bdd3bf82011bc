//! # Partial molar properties from the excess functional
//!
//! For the binary mixture with Q(x_A):
//! - water (B):  Q - x_A dQ/dx_A
//! - acid (A):   Q + x_B dQ/dx_A
//!
//! optionally minus ln(x) of the component when the variant asks for the ideal term to be removed.
//! dQ/dx_A is a finite difference with step h:
//! - x_A <= h      forward   (Q(x+h) - Q(x)) / h
//! - h < x_A < 1-h centered  (Q(x+h) - Q(x-h)) / 2h
//! - x_A >= 1-h    backward  (Q(x) - Q(x-h)) / h
//!
//! so the functional is never evaluated outside [0, 1].
//!
//! The water value is -μ_B/RT, hence the water activity a_w = exp(-value).
use crate::Thermodynamics::DBhandlers::ZeleznikParams::{ParameterDatabase, Species};
use crate::Thermodynamics::ExcessFunctions::composition::{Composition, safe_ln};
use crate::Thermodynamics::ExcessFunctions::excess_functional::{
    ExcessFunctional, InteractionSlice,
};
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};

pub const DEFAULT_STEP: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceScheme {
    Forward,
    Centered,
    Backward,
}

#[derive(Debug, Clone, Copy)]
pub struct PartialMolarExtractor<'a> {
    functional: ExcessFunctional<'a>,
    step: f64,
}

impl<'a> PartialMolarExtractor<'a> {
    pub fn new(db: &'a ParameterDatabase) -> Self {
        Self {
            functional: ExcessFunctional::new(db),
            step: DEFAULT_STEP,
        }
    }

    pub fn with_step(db: &'a ParameterDatabase, step: f64) -> ZeleznikResult<Self> {
        if !step.is_finite() || step <= 0.0 || step >= 0.5 {
            return Err(ZeleznikError::configuration(format!(
                "finite difference step must lie in (0, 0.5), got {}",
                step
            )));
        }
        Ok(Self {
            functional: ExcessFunctional::new(db),
            step,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn functional(&self) -> &ExcessFunctional<'a> {
        &self.functional
    }

    pub fn slice(&self, t: f64) -> ZeleznikResult<InteractionSlice> {
        self.functional.slice(t)
    }

    pub fn scheme(&self, x_a: f64) -> DifferenceScheme {
        let h = self.step;
        if x_a <= h {
            DifferenceScheme::Forward
        } else if x_a >= 1.0 - h {
            DifferenceScheme::Backward
        } else {
            DifferenceScheme::Centered
        }
    }

    /// dQ/dx_A at the composition x_A, for a precomputed temperature slice
    pub fn derivative_in_slice(
        &self,
        slice: &InteractionSlice,
        x_a: f64,
        variant: &ModelVariant,
    ) -> ZeleznikResult<f64> {
        let h = self.step;
        let q_at = |x: f64| -> ZeleznikResult<f64> {
            Ok(slice.excess_q(&Composition::from_solute(x)?, variant))
        };
        let dq = match self.scheme(x_a) {
            DifferenceScheme::Forward => (q_at(x_a + h)? - q_at(x_a)?) / h,
            DifferenceScheme::Centered => (q_at(x_a + h)? - q_at(x_a - h)?) / (2.0 * h),
            DifferenceScheme::Backward => (q_at(x_a)? - q_at(x_a - h)?) / h,
        };
        Ok(dq)
    }

    pub fn derivative(&self, x_a: f64, t: f64, variant: &ModelVariant) -> ZeleznikResult<f64> {
        Composition::from_solute(x_a)?;
        let slice = self.slice(t)?;
        self.derivative_in_slice(&slice, x_a, variant)
    }

    /// partial molar property of `species` at a precomputed temperature slice
    pub fn partial_molar_in_slice(
        &self,
        slice: &InteractionSlice,
        species: Species,
        x_a: f64,
        variant: &ModelVariant,
    ) -> ZeleznikResult<f64> {
        let x = Composition::from_solute(x_a)?;
        let q = slice.excess_q(&x, variant);
        let dq = self.derivative_in_slice(slice, x_a, variant)?;
        let mut value = match species {
            Species::B => q - x.x_a() * dq,
            Species::A => q + x.x_b() * dq,
        };
        if variant.subtract_ideal {
            value -= safe_ln(x.x(species));
        }
        Ok(value)
    }

    pub fn partial_molar_for(
        &self,
        species: Species,
        x_a: f64,
        t: f64,
        variant: &ModelVariant,
    ) -> ZeleznikResult<f64> {
        Composition::from_solute(x_a)?;
        let slice = self.slice(t)?;
        self.partial_molar_in_slice(&slice, species, x_a, variant)
    }

    /// partial molar property of the solvent (water), -mu_2/RT in the literature tables
    pub fn partial_molar(&self, x_a: f64, t: f64, variant: &ModelVariant) -> ZeleznikResult<f64> {
        self.partial_molar_for(Species::B, x_a, t, variant)
    }

    pub fn water_activity_in_slice(
        &self,
        slice: &InteractionSlice,
        x_a: f64,
        variant: &ModelVariant,
    ) -> ZeleznikResult<f64> {
        let value = self.partial_molar_in_slice(slice, Species::B, x_a, variant)?;
        Ok((-value).exp())
    }

    /// a_w = exp(-partial_molar)
    pub fn water_activity(&self, x_a: f64, t: f64, variant: &ModelVariant) -> ZeleznikResult<f64> {
        Composition::from_solute(x_a)?;
        let slice = self.slice(t)?;
        self.water_activity_in_slice(&slice, x_a, variant)
    }
}
