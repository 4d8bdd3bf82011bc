use AcidThe::cli::cli_main::{COMMANDS, report_error, run_command, run_interactive_menu};
use log::{LevelFilter, error};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::process::ExitCode;

pub fn main() -> ExitCode {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first() {
        None => run_interactive_menu(),
        Some(command) if COMMANDS.contains(&command.as_str()) => {
            run_command(command, args.get(1).map(|s| s.as_str()))
        }
        Some(other) => {
            println!(
                "usage: AcidThe [{} [config.json]]\nunknown command '{}'",
                COMMANDS.join(" | "),
                other
            );
            return ExitCode::FAILURE;
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
