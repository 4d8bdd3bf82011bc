use super::cli_calibration::{calibrate, calibration_menu, offset_report, sweep};
use super::cli_examples::examples_menu;
use super::cli_export::export;
use crate::Thermodynamics::error::{ZeleznikError, ZeleznikResult};
use crate::settings::{ConfigManager, DEFAULT_CONFIG_FILE};
use std::io::{self, Write};

pub const COMMANDS: [&str; 4] = ["calibrate", "sweep", "offset", "export"];

/// non-interactive entry point: `<command> [config file]`
pub fn run_command(command: &str, config_file: Option<&str>) -> ZeleznikResult<()> {
    let manager = ConfigManager::with_config_file(config_file.unwrap_or(DEFAULT_CONFIG_FILE))?;
    match command {
        "calibrate" => calibrate(&manager),
        "sweep" => sweep(&manager),
        "offset" => offset_report(&manager),
        "export" => export(&manager).map(|_| ()),
        other => Err(ZeleznikError::configuration(format!(
            "unknown command '{}', expected one of {}",
            other,
            COMMANDS.join(", ")
        ))),
    }
}

pub fn run_interactive_menu() -> ZeleznikResult<()> {
    let mut manager = ConfigManager::new()?;
    loop {
        show_main_menu();
        let Some(choice) = get_user_input() else {
            break;
        };

        let result = match choice.trim() {
            "1" => calibration_menu(&manager),
            "2" => export(&manager).map(|_| ()),
            "3" => manager.database().map(|db| db.pretty_print()),
            "4" => {
                examples_menu();
                Ok(())
            }
            "5" => load_config_dialog(&mut manager),
            "6" => manager.save_config().map(|_| {
                println!("Configuration saved to '{}'", manager.config_file());
            }),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };
        if let Err(e) = result {
            report_error(&e);
        }
    }
    Ok(())
}

pub fn report_error(e: &ZeleznikError) {
    println!("\x1b[31mError: {}\x1b[0m", e);
}

fn load_config_dialog(manager: &mut ConfigManager) -> ZeleznikResult<()> {
    prompt("Enter configuration file path: ");
    let Some(path) = get_user_input() else {
        return Ok(());
    };
    *manager = ConfigManager::with_config_file(path.trim())?;
    println!("Using configuration '{}'", manager.config_file());
    Ok(())
}

/* colors
Blue (\x1b[34m) - Welcome header text
Yellow (\x1b[33m) - Menu options
Cyan (\x1b[36m) - prompts
Red (\x1b[31m) - errors
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to AcidThe: excess Gibbs energy correlation for\n
    aqueous sulfuric acid, calibration against reference tables \n \x1b[0m"
    );
    println!("\x1b[33m1. Calibration\x1b[0m");
    println!("\x1b[33m2. Export grid\x1b[0m");
    println!("\x1b[33m3. Show parameter table\x1b[0m");
    println!("\x1b[33m4. Examples\x1b[0m");
    println!("\x1b[33m5. Load configuration file\x1b[0m");
    println!("\x1b[33m6. Save configuration\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    prompt("Enter your choice: ");
}

pub(crate) fn prompt(text: &str) {
    print!("\x1b[36m{}\x1b[0m", text);
    let _ = io::stdout().flush();
}

/// None on end of input
pub(crate) fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_command() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        assert!(matches!(
            run_command("frobnicate", path.to_str()),
            Err(ZeleznikError::Configuration(_))
        ));
    }

    #[test]
    fn test_offset_command() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        assert!(run_command("offset", path.to_str()).is_ok());
    }
}
