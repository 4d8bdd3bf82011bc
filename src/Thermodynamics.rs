/// coefficient tables and their temperature basis
#[allow(non_snake_case)]
pub mod DBhandlers;
/// excess Gibbs functional of the binary mixture and the partial molar properties derived from it
#[allow(non_snake_case)]
pub mod ExcessFunctions;
/// error taxonomy of the crate
pub mod error;
