pub mod zeleznik_examples;
