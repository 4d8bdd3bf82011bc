pub mod cli_calibration;
pub mod cli_examples;
pub mod cli_export;
pub mod cli_main;
