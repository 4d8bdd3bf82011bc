/// The 5-term temperature basis of the Zeleznik coefficients:
/// p(T) = c0 + c1*T + c2*T^2 + c3/T + c4*ln(T)
use crate::Thermodynamics::DBhandlers::ZeleznikParams::ParameterSet;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use RustedSciThe::symbolic::symbolic_engine::Expr;

fn p(t: f64, c0: f64, c1: f64, c2: f64, c3: f64, c4: f64) -> f64 {
    c0 + c1 * t + c2 * t.powi(2) + c3 / t + c4 * t.ln()
}

pub fn check_temperature(t: f64) -> ZeleznikResult<()> {
    if !t.is_finite() || t <= 0.0 {
        return Err(ZeleznikError::domain(format!(
            "temperature must be a finite positive number of kelvins, got {} K",
            t
        )));
    }
    Ok(())
}

/// value of the basis at temperature t (K)
pub fn evaluate(set: &ParameterSet, t: f64) -> ZeleznikResult<f64> {
    check_temperature(t)?;
    let [c0, c1, c2, c3, c4] = *set.coeffs();
    Ok(p(t, c0, c1, c2, c3, c4))
}

/// symbolic form of the basis in variable "T"
pub fn basis_sym(set: &ParameterSet) -> Expr {
    let t = Expr::Var("T".to_owned());
    let [c0, c1, c2, c3, c4] = *set.coeffs();
    let (c0, c1, c2, c3, c4) = (
        Expr::Const(c0),
        Expr::Const(c1),
        Expr::Const(c2),
        Expr::Const(c3),
        Expr::Const(c4),
    );
    let expr = c0
        + c1 * t.clone()
        + c2 * t.clone().pow(Expr::Const(2.0))
        + c3 / t.clone()
        + c4 * t.clone().ln();
    expr.symplify()
}

/// closure p(T) for repeated numeric evaluation; the caller guarantees T > 0
pub fn basis_fun(set: &ParameterSet) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
    let [c0, c1, c2, c3, c4] = *set.coeffs();
    Box::new(move |t: f64| p(t, c0, c1, c2, c3, c4))
}
