use super::cli_main::{get_user_input, prompt};
use crate::Examples::zeleznik_examples::zeleznik_examples;

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Parameter table");
        println!("2. Symbolic temperature basis");
        println!("3. Terms of the excess functional");
        println!("4. Partial molar properties and difference schemes");
        println!("5. Variant sweep");
        println!("6. Small grid export");
        println!("0. Back to main menu");
        prompt("Enter your choice: ");

        let Some(choice) = get_user_input() else {
            break;
        };
        match choice.trim() {
            "1" => zeleznik_examples(0),
            "2" => zeleznik_examples(1),
            "3" => zeleznik_examples(2),
            "4" => zeleznik_examples(3),
            "5" => zeleznik_examples(4),
            "6" => zeleznik_examples(5),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
