/// comparison of model variants with literature tables
pub mod calibration_harness;
/// polynomial interpolant of the standard-state offset
pub mod offset_fit;
pub mod reference_data;
pub mod rms_report;
