/// temperature-dependent coefficient table of the Zeleznik correlation (mu and eps families)
pub mod ZeleznikParams;
/// 5-term temperature basis: numeric, closure and symbolic forms
pub mod basis;
