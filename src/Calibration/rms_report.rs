//! Deviation of model predictions from reference points and the RMS summary of a variant.
use crate::Calibration::reference_data::ReferencePoint;
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use log::warn;
use prettytable::{Table, row};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deviation {
    pub x_acid: f64,
    pub temperature: f64,
    pub computed: f64,
    pub reference: f64,
    /// computed - reference
    pub difference: f64,
    /// relative deviation in %, None when the reference value is zero
    pub percent: Option<f64>,
}

impl Deviation {
    pub fn new(point: &ReferencePoint, computed: f64) -> Self {
        let difference = computed - point.value;
        let percent = if point.value != 0.0 {
            Some(100.0 * difference / point.value.abs())
        } else {
            None
        };
        Self {
            x_acid: point.x_acid,
            temperature: point.temperature,
            computed,
            reference: point.value,
            difference,
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmsReport {
    pub variant: ModelVariant,
    pub offset_applied: bool,
    pub deviations: Vec<Deviation>,
    pub rms: f64,
    pub max_abs: f64,
    /// acceptability threshold supplied by the caller
    pub threshold: Option<f64>,
    /// rms exceeds threshold; never set without a threshold
    pub flagged: bool,
}

impl RmsReport {
    pub fn new(
        variant: ModelVariant,
        offset_applied: bool,
        deviations: Vec<Deviation>,
        threshold: Option<f64>,
    ) -> Self {
        let n = deviations.len().max(1) as f64;
        let rms = (deviations
            .iter()
            .map(|d| d.difference * d.difference)
            .sum::<f64>()
            / n)
            .sqrt();
        let max_abs = deviations
            .iter()
            .map(|d| d.difference.abs())
            .fold(0.0, f64::max);
        let flagged = threshold.is_some_and(|t| !(rms <= t));
        if let Some(t) = threshold.filter(|_| flagged) {
            warn!(
                "variant {} exceeds RMS threshold: {:.4} > {:.4}",
                variant, rms, t
            );
        }
        Self {
            variant,
            offset_applied,
            deviations,
            rms,
            max_abs,
            threshold,
            flagged,
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row![
            "x_acid",
            "T, K",
            "computed",
            "reference",
            "difference",
            "error, %"
        ]);
        for d in &self.deviations {
            let percent = match d.percent {
                Some(p) => format!("{:.2}", p),
                None => "-".to_string(),
            };
            table.add_row(row![
                format!("{:.3}", d.x_acid),
                format!("{:.2}", d.temperature),
                format!("{:.4}", d.computed),
                format!("{:.4}", d.reference),
                format!("{:+.4}", d.difference),
                percent
            ]);
        }
        table
    }

    pub fn pretty_print(&self) {
        println!(
            "Variant {}{}",
            self.variant,
            if self.offset_applied {
                " (offset applied)"
            } else {
                ""
            }
        );
        self.to_table().printstd();
        println!(
            "RMS = {:.4}, max |dev| = {:.4}{}",
            self.rms,
            self.max_abs,
            if self.flagged { "  POOR FIT" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rms_by_hand() {
        let points = [
            ReferencePoint::new(0.1, 298.15, 1.0),
            ReferencePoint::new(0.5, 298.15, 2.0),
        ];
        let devs = vec![Deviation::new(&points[0], 2.0), Deviation::new(&points[1], 1.0)];
        assert_relative_eq!(devs[0].percent.unwrap(), 100.0);
        assert_relative_eq!(devs[1].percent.unwrap(), -50.0);
        let report = RmsReport::new(ModelVariant::default(), false, devs, Some(0.5));
        assert_relative_eq!(report.rms, 1.0);
        assert_relative_eq!(report.max_abs, 1.0);
        assert!(report.flagged);
        assert_eq!(report.to_table().len(), 3);
    }

    #[test]
    fn test_zero_reference_has_no_percent() {
        let p = ReferencePoint::new(0.0, 298.15, 0.0);
        let d = Deviation::new(&p, 0.25);
        assert!(d.percent.is_none());
        let report = RmsReport::new(ModelVariant::default(), true, vec![d], Some(1.0));
        assert!(!report.flagged);
        assert_relative_eq!(report.rms, 0.25);
    }

    #[test]
    fn test_serialize() {
        let p = ReferencePoint::new(0.5, 298.15, 6.8584);
        let report = RmsReport::new(
            ModelVariant::default(),
            false,
            vec![Deviation::new(&p, 6.8584)],
            None,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["variant"], "solute_only/j/raw");
        assert_eq!(json["rms"], 0.0);
        assert!(json["threshold"].is_null());
    }

    #[test]
    fn test_no_threshold_never_flags() {
        let p = ReferencePoint::new(0.5, 298.15, 1.0);
        let report = RmsReport::new(
            ModelVariant::default(),
            false,
            vec![Deviation::new(&p, 100.0)],
            None,
        );
        assert_relative_eq!(report.rms, 99.0);
        assert!(!report.flagged);
    }
}
