use crate::Thermodynamics::ExcessFunctions::partial_molar::PartialMolarExtractor;
use crate::Thermodynamics::error::ZeleznikResult;
use crate::Utils::grid_export::{ExportSummary, GridExporter};
use crate::settings::ConfigManager;

/// writes the configured grid to the configured output file
pub fn export(manager: &ConfigManager) -> ZeleznikResult<ExportSummary> {
    let config = manager.config();
    let db = manager.database()?;
    let extractor = PartialMolarExtractor::with_step(&db, config.derivative_step)?;
    let summary = GridExporter::new(extractor, config.variant)
        .export_to_file(&config.grid, &config.output_file)?;
    println!(
        "{} rows ({} temperatures x {} concentrations) written to '{}'",
        summary.rows, summary.temperatures, summary.concentrations, config.output_file
    );
    Ok(summary)
}
