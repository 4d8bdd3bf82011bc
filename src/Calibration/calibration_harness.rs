//! # Calibration harness
//!
//! Scores model variants against reference points by RMS error. The harness never touches the
//! parameter database; it varies only the `ModelVariant` and the `OffsetFunction`, and leaves the
//! choice of hypothesis to the caller.
//!
//! With an offset the prediction compared to the table is
//! `partial_molar(x, T, variant) + offset(T)`.
use crate::Calibration::offset_fit::OffsetFunction;
use crate::Calibration::reference_data::ReferencePoint;
use crate::Calibration::rms_report::{Deviation, RmsReport};
use crate::Thermodynamics::DBhandlers::ZeleznikParams::ParameterDatabase;
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use crate::Thermodynamics::ExcessFunctions::partial_molar::PartialMolarExtractor;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use log::{debug, info};
use prettytable::{Table, row};
use rayon::prelude::*;
use std::cmp::Ordering;

pub struct CalibrationHarness<'a> {
    extractor: PartialMolarExtractor<'a>,
    /// reports are flagged only when a threshold is given
    threshold: Option<f64>,
}

impl<'a> CalibrationHarness<'a> {
    pub fn new(db: &'a ParameterDatabase) -> Self {
        Self {
            extractor: PartialMolarExtractor::new(db),
            threshold: None,
        }
    }

    pub fn with_step(db: &'a ParameterDatabase, step: f64) -> ZeleznikResult<Self> {
        Ok(Self {
            extractor: PartialMolarExtractor::with_step(db, step)?,
            threshold: None,
        })
    }

    pub fn with_threshold(mut self, threshold: f64) -> ZeleznikResult<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ZeleznikError::configuration(format!(
                "RMS threshold must be a non-negative number, got {}",
                threshold
            )));
        }
        self.threshold = Some(threshold);
        Ok(self)
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn extractor(&self) -> &PartialMolarExtractor<'a> {
        &self.extractor
    }

    /// raw model value at the composition and temperature of the point
    pub fn predict(&self, point: &ReferencePoint, variant: &ModelVariant) -> ZeleznikResult<f64> {
        self.extractor
            .partial_molar(point.x_acid, point.temperature, variant)
    }

    fn deviations(
        &self,
        variant: &ModelVariant,
        points: &[ReferencePoint],
        offset: Option<&OffsetFunction>,
    ) -> ZeleznikResult<Vec<Deviation>> {
        if points.is_empty() {
            return Err(ZeleznikError::configuration(
                "cannot score a variant against an empty set of reference points",
            ));
        }
        let mut deviations = Vec::with_capacity(points.len());
        for point in points {
            point.validate()?;
            let mut computed = self.predict(point, variant)?;
            if let Some(offset) = offset {
                computed += offset.evaluate(point.temperature);
            }
            debug!(
                "{} at x = {}, T = {}: computed {:.6}, reference {:.6}",
                variant, point.x_acid, point.temperature, computed, point.value
            );
            deviations.push(Deviation::new(point, computed));
        }
        Ok(deviations)
    }

    /// RMS of (predicted - reference) over `points`
    pub fn score(
        &self,
        variant: &ModelVariant,
        points: &[ReferencePoint],
    ) -> ZeleznikResult<RmsReport> {
        let deviations = self.deviations(variant, points, None)?;
        Ok(RmsReport::new(*variant, false, deviations, self.threshold))
    }

    /// same as `score` with offset(T) added to every prediction
    pub fn score_with_offset(
        &self,
        variant: &ModelVariant,
        points: &[ReferencePoint],
        offset: &OffsetFunction,
    ) -> ZeleznikResult<RmsReport> {
        let deviations = self.deviations(variant, points, Some(offset))?;
        Ok(RmsReport::new(*variant, true, deviations, self.threshold))
    }

    /// scores every variant in parallel; reports keep the order of `variants`
    pub fn sweep(
        &self,
        variants: &[ModelVariant],
        points: &[ReferencePoint],
        offset: Option<&OffsetFunction>,
    ) -> ZeleznikResult<VariantSweep> {
        if variants.is_empty() {
            return Err(ZeleznikError::configuration("no model variants to compare"));
        }
        let reports = variants
            .par_iter()
            .map(|variant| match offset {
                Some(offset) => self.score_with_offset(variant, points, offset),
                None => self.score(variant, points),
            })
            .collect::<ZeleznikResult<Vec<RmsReport>>>()?;
        let sweep = VariantSweep { reports };
        if let Some(best) = sweep.best() {
            info!(
                "Compared {} variants on {} points, lowest RMS {:.4} for {}",
                variants.len(),
                points.len(),
                best.rms,
                best.variant
            );
        }
        Ok(sweep)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantSweep {
    pub reports: Vec<RmsReport>,
}

impl VariantSweep {
    /// reports by increasing RMS; NaN sorts last
    pub fn ranked(&self) -> Vec<&RmsReport> {
        let mut ranked: Vec<&RmsReport> = self.reports.iter().collect();
        ranked.sort_by(|a, b| match (a.rms.is_nan(), b.rms.is_nan()) {
            (false, false) => a.rms.total_cmp(&b.rms),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => Ordering::Equal,
        });
        ranked
    }

    pub fn best(&self) -> Option<&RmsReport> {
        self.ranked().into_iter().next()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["rank", "variant", "RMS", "max |dev|", "fit"]);
        for (n, report) in self.ranked().iter().enumerate() {
            table.add_row(row![
                n + 1,
                report.variant.to_string(),
                format!("{:.4}", report.rms),
                format!("{:.4}", report.max_abs),
                if report.flagged { "poor" } else { "ok" }
            ]);
        }
        table
    }

    pub fn pretty_print(&self) {
        self.to_table().printstd();
    }
}
