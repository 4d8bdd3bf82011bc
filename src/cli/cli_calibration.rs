use super::cli_main::{get_user_input, prompt, report_error};
use crate::Calibration::calibration_harness::CalibrationHarness;
use crate::Calibration::reference_data::{ReferencePoint, at_temperature};
use crate::Thermodynamics::DBhandlers::ZeleznikParams::ParameterDatabase;
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use crate::Thermodynamics::error::ZeleznikResult;
use crate::settings::ConfigManager;
use prettytable::{Table, row};

pub fn calibration_menu(manager: &ConfigManager) -> ZeleznikResult<()> {
    loop {
        println!("\n=== Calibration ===");
        println!("\x1b[33m1. Score configured variant\x1b[0m");
        println!("\x1b[33m2. Compare candidate variants\x1b[0m");
        println!("\x1b[33m3. Offset interpolant\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");
        prompt("Enter your choice: ");

        let Some(choice) = get_user_input() else {
            return Ok(());
        };
        let result = match choice.trim() {
            "1" => calibrate(manager),
            "2" => sweep(manager),
            "3" => offset_report(manager),
            "0" => return Ok(()),
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };
        if let Err(e) = result {
            report_error(&e);
        }
    }
}

fn harness<'a>(
    manager: &ConfigManager,
    db: &'a ParameterDatabase,
) -> ZeleznikResult<CalibrationHarness<'a>> {
    let config = manager.config();
    let harness = CalibrationHarness::with_step(db, config.derivative_step)?;
    match config.rms_threshold {
        Some(threshold) => harness.with_threshold(threshold),
        None => Ok(harness),
    }
}

/// (all reference points, points at the reference temperature)
fn points_at_reference(
    manager: &ConfigManager,
) -> ZeleznikResult<(Vec<ReferencePoint>, Vec<ReferencePoint>)> {
    let all = manager.reference_points()?;
    let at_t = at_temperature(&all, manager.config().reference_temperature);
    Ok((all, at_t))
}

/// report of the configured variant: raw at the reference temperature, then with the offset at
/// every reference point
pub fn calibrate(manager: &ConfigManager) -> ZeleznikResult<()> {
    let db = manager.database()?;
    let harness = harness(manager, &db)?;
    let variant = manager.config().variant;
    let (all, at_t) = points_at_reference(manager)?;

    let raw = harness.score(&variant, &at_t)?;
    raw.pretty_print();
    println!("Water activity at {} K", manager.config().reference_temperature);
    activity_table(&harness, &variant, &at_t)?.printstd();
    let offset = manager.offset()?;
    let shifted = harness.score_with_offset(&variant, &all, &offset)?;
    shifted.pretty_print();
    Ok(())
}

/// model water activity next to the one implied by each tabulated value
pub fn activity_table(
    harness: &CalibrationHarness,
    variant: &ModelVariant,
    points: &[ReferencePoint],
) -> ZeleznikResult<Table> {
    let mut table = Table::new();
    table.add_row(row!["x_acid", "T, K", "a_w", "a_w (table)"]);
    for point in points {
        point.validate()?;
        let aw = harness
            .extractor()
            .water_activity(point.x_acid, point.temperature, variant)?;
        table.add_row(row![
            format!("{:.3}", point.x_acid),
            format!("{:.2}", point.temperature),
            format!("{:.6e}", aw),
            format!("{:.6e}", (-point.value).exp())
        ]);
    }
    Ok(table)
}

pub fn sweep(manager: &ConfigManager) -> ZeleznikResult<()> {
    let db = manager.database()?;
    let harness = harness(manager, &db)?;
    let (all, at_t) = points_at_reference(manager)?;
    let candidates = &manager.config().candidate_variants;

    println!(
        "\nRaw model output at {} K",
        manager.config().reference_temperature
    );
    harness.sweep(candidates, &at_t, None)?.pretty_print();
    let offset = manager.offset()?;
    println!("\nWith offset, all reference points");
    harness.sweep(candidates, &all, Some(&offset))?.pretty_print();
    Ok(())
}

pub fn offset_report(manager: &ConfigManager) -> ZeleznikResult<()> {
    let offset = manager.offset()?;
    let mut table = Table::new();
    table.add_row(row!["T, K", "anchor", "offset(T)"]);
    for (t, v) in offset.anchors() {
        table.add_row(row![
            format!("{:.2}", t),
            format!("{:.4}", v),
            format!("{:.6}", offset.evaluate(*t))
        ]);
    }
    for t in [273.15, 323.15, 373.15] {
        table.add_row(row![
            format!("{:.2}", t),
            "-",
            format!("{:.6}", offset.evaluate(t))
        ]);
    }
    println!("\nOffset interpolant of degree {}", offset.degree());
    table.printstd();
    Ok(())
}
