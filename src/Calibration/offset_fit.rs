//! Interpolating polynomial through (T, offset) anchors.
//!
//! Raw model output and the reference tables use different standard-state normalizations; the
//! difference is a smooth function of temperature known at a few anchors (pure water). The
//! polynomial of degree n-1 through n anchors reproduces every anchor and is evaluated anywhere,
//! including outside the anchored range.
//!
//! The Vandermonde system is solved in the scaled variable s = (T - T_center) / T_scale with an
//! LU decomposition.
use crate::Thermodynamics::DBhandlers::basis::check_temperature;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, PartialEq)]
pub struct OffsetFunction {
    anchors: Vec<(f64, f64)>,
    center: f64,
    scale: f64,
    /// coefficients of 1, s, s^2, ...
    coeffs: DVector<f64>,
}

impl OffsetFunction {
    /// offset(T) = 0
    pub fn zero() -> Self {
        Self {
            anchors: Vec::new(),
            center: 0.0,
            scale: 1.0,
            coeffs: DVector::zeros(1),
        }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let s = (t - self.center) / self.scale;
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * s + c)
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn anchors(&self) -> &[(f64, f64)] {
        &self.anchors
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| *c == 0.0)
    }
}

impl Default for OffsetFunction {
    fn default() -> Self {
        OffsetFunction::zero()
    }
}

/// polynomial of degree anchors.len() - 1 through every (T, value) anchor
pub fn fit_offset(anchors: &[(f64, f64)]) -> ZeleznikResult<OffsetFunction> {
    if anchors.is_empty() {
        return Err(ZeleznikError::configuration(
            "offset interpolant needs at least one anchor",
        ));
    }
    for (t, v) in anchors {
        check_temperature(*t)?;
        if !v.is_finite() {
            return Err(ZeleznikError::domain(format!(
                "offset anchor at {} K is not finite",
                t
            )));
        }
    }
    for (n, (ti, _)) in anchors.iter().enumerate() {
        if anchors[n + 1..].iter().any(|(tj, _)| (ti - tj).abs() < 1e-9) {
            return Err(ZeleznikError::configuration(format!(
                "duplicate offset anchor temperature {} K",
                ti
            )));
        }
    }

    let n = anchors.len();
    let center = anchors.iter().map(|(t, _)| t).sum::<f64>() / n as f64;
    let spread = anchors
        .iter()
        .map(|(t, _)| (t - center).abs())
        .fold(0.0, f64::max);
    let scale = if spread > 0.0 { spread } else { 1.0 };
    let s: Vec<f64> = anchors.iter().map(|(t, _)| (t - center) / scale).collect();
    let vandermonde = DMatrix::from_fn(n, n, |r, c| s[r].powi(c as i32));
    let y = DVector::from_iterator(n, anchors.iter().map(|(_, v)| *v));
    let coeffs = vandermonde.lu().solve(&y).ok_or_else(|| {
        ZeleznikError::configuration("offset anchors give a singular interpolation system")
    })?;

    let offset = OffsetFunction {
        anchors: anchors.to_vec(),
        center,
        scale,
        coeffs,
    };
    for (t, v) in anchors {
        let residual = (offset.evaluate(*t) - v).abs();
        if residual > 1e-8 * (1.0 + v.abs()) {
            return Err(ZeleznikError::configuration(format!(
                "offset interpolant does not reproduce anchor at {} K (residual {:e})",
                t, residual
            )));
        }
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Calibration::reference_data::pure_water_anchors;
    use approx::assert_relative_eq;

    fn lagrange3(anchors: &[(f64, f64)], t: f64) -> f64 {
        let (t1, y1) = anchors[0];
        let (t2, y2) = anchors[1];
        let (t3, y3) = anchors[2];
        y1 * (t - t2) * (t - t3) / ((t1 - t2) * (t1 - t3))
            + y2 * (t - t1) * (t - t3) / ((t2 - t1) * (t2 - t3))
            + y3 * (t - t1) * (t - t2) / ((t3 - t1) * (t3 - t2))
    }

    #[test]
    fn test_reproduces_anchors() {
        let anchors = pure_water_anchors();
        let offset = fit_offset(&anchors).unwrap();
        assert_eq!(offset.degree(), 2);
        for (t, v) in &anchors {
            assert_relative_eq!(offset.evaluate(*t), *v, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_matches_lagrange_form() {
        let anchors = pure_water_anchors();
        let offset = fit_offset(&anchors).unwrap();
        for t in [230.0, 273.15, 320.0, 348.15, 400.0] {
            assert_relative_eq!(offset.evaluate(t), lagrange3(&anchors, t), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_more_anchors() {
        // cubic through 4 anchors sampled from a cubic
        let f = |t: f64| 1e-6 * (t - 300.0).powi(3) - 2e-4 * (t - 300.0).powi(2) + 0.01 * t;
        let anchors: Vec<(f64, f64)> = [250.0, 280.0, 320.0, 360.0]
            .iter()
            .map(|t| (*t, f(*t)))
            .collect();
        let offset = fit_offset(&anchors).unwrap();
        assert_eq!(offset.degree(), 3);
        for t in [240.0, 300.0, 375.0] {
            assert_relative_eq!(offset.evaluate(t), f(t), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_single_and_linear() {
        let constant = fit_offset(&[(300.0, 0.5)]).unwrap();
        assert_eq!(constant.degree(), 0);
        assert_relative_eq!(constant.evaluate(100.0), 0.5);
        let linear = fit_offset(&[(300.0, 0.0), (350.0, 1.0)]).unwrap();
        assert_relative_eq!(linear.evaluate(325.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(linear.evaluate(400.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bad_anchors() {
        assert!(matches!(
            fit_offset(&[]),
            Err(ZeleznikError::Configuration(_))
        ));
        assert!(matches!(
            fit_offset(&[(300.0, 0.1), (300.0, 0.2)]),
            Err(ZeleznikError::Configuration(_))
        ));
        assert!(matches!(
            fit_offset(&[(-10.0, 0.1)]),
            Err(ZeleznikError::Domain(_))
        ));
    }

    #[test]
    fn test_zero() {
        let zero = OffsetFunction::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.evaluate(298.15), 0.0);
        assert!(zero.anchors().is_empty());
    }
}
