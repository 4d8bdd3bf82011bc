//! # Excess functional
//!
//! Q = -G^(e)/RT = Σ_i Φ(i) Σ_j Σ_k (μ_jki + ε_jki ln x_l) x_j x_k,  i, j, k ∈ {A, B}
//!
//! where Φ is the weighting policy of the model variant and l ∈ {j, k, i} its log index.
//! `InteractionSlice` holds all μ and ε values at one temperature so that the functional can be
//! evaluated for many compositions without touching the basis again.
use crate::Thermodynamics::DBhandlers::ZeleznikParams::{Family, ParameterDatabase, Species};
use crate::Thermodynamics::DBhandlers::basis::{check_temperature, evaluate};
use crate::Thermodynamics::ExcessFunctions::composition::Composition;
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use crate::Thermodynamics::error::ZeleznikResult;

/// species whose |Φ| is below this value are skipped
pub const PHI_NEGLIGIBLE: f64 = 1e-20;

#[inline]
fn idx(s: Species) -> usize {
    s.index() - 1
}

/// one term of the double sum, for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub i: Species,
    pub j: Species,
    pub k: Species,
    pub phi: f64,
    pub mu: f64,
    pub eps: f64,
    pub ln_x: f64,
    /// (μ + ε ln x) x_j x_k, without Φ
    pub value: f64,
}

/// μ_jki(T) and ε_jki(T) for all 8 index triples at a fixed temperature
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSlice {
    t: f64,
    /// [i][j][k]
    mu: [[[f64; 2]; 2]; 2],
    eps: [[[f64; 2]; 2]; 2],
}

impl InteractionSlice {
    pub fn at(db: &ParameterDatabase, t: f64) -> ZeleznikResult<Self> {
        check_temperature(t)?;
        let mut mu = [[[0.0; 2]; 2]; 2];
        let mut eps = [[[0.0; 2]; 2]; 2];
        for i in Species::ALL {
            for j in Species::ALL {
                for k in Species::ALL {
                    mu[idx(i)][idx(j)][idx(k)] =
                        evaluate(&db.lookup(Family::Interaction, j, k, i), t)?;
                    eps[idx(i)][idx(j)][idx(k)] =
                        evaluate(&db.lookup(Family::LogInteraction, j, k, i), t)?;
                }
            }
        }
        Ok(Self { t, mu, eps })
    }

    pub fn temperature(&self) -> f64 {
        self.t
    }

    pub fn mu(&self, j: Species, k: Species, i: Species) -> f64 {
        self.mu[idx(i)][idx(j)][idx(k)]
    }

    pub fn eps(&self, j: Species, k: Species, i: Species) -> f64 {
        self.eps[idx(i)][idx(j)][idx(k)]
    }

    /// S_i = Σ_j Σ_k (μ_jki + ε_jki ln x_l) x_j x_k
    pub fn species_sum(&self, i: Species, x: &Composition, variant: &ModelVariant) -> f64 {
        let mut sum = 0.0;
        for j in Species::ALL {
            for k in Species::ALL {
                let ln_x = x.ln_x(variant.log_index.select(j, k, i));
                sum += (self.mu(j, k, i) + self.eps(j, k, i) * ln_x) * x.x(j) * x.x(k);
            }
        }
        sum
    }

    /// Q at composition x
    pub fn excess_q(&self, x: &Composition, variant: &ModelVariant) -> f64 {
        let mut q = 0.0;
        for i in Species::ALL {
            let phi = variant.phi(i, x);
            if phi.abs() < PHI_NEGLIGIBLE {
                continue;
            }
            q += phi * self.species_sum(i, x, variant);
        }
        q
    }

    /// all 8 terms of the double sum including the skipped species
    pub fn terms(&self, x: &Composition, variant: &ModelVariant) -> Vec<Term> {
        let mut terms = Vec::with_capacity(8);
        for i in Species::ALL {
            let phi = variant.phi(i, x);
            for j in Species::ALL {
                for k in Species::ALL {
                    let (mu, eps) = (self.mu(j, k, i), self.eps(j, k, i));
                    let ln_x = x.ln_x(variant.log_index.select(j, k, i));
                    terms.push(Term {
                        i,
                        j,
                        k,
                        phi,
                        mu,
                        eps,
                        ln_x,
                        value: (mu + eps * ln_x) * x.x(j) * x.x(k),
                    });
                }
            }
        }
        terms
    }
}

/// evaluator of Q bound to a parameter database
#[derive(Debug, Clone, Copy)]
pub struct ExcessFunctional<'a> {
    db: &'a ParameterDatabase,
}

impl<'a> ExcessFunctional<'a> {
    pub fn new(db: &'a ParameterDatabase) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &'a ParameterDatabase {
        self.db
    }

    pub fn slice(&self, t: f64) -> ZeleznikResult<InteractionSlice> {
        InteractionSlice::at(self.db, t)
    }

    pub fn excess_q(&self, x: &Composition, t: f64, variant: &ModelVariant) -> ZeleznikResult<f64> {
        Ok(self.slice(t)?.excess_q(x, variant))
    }
}
