/// weight percent <-> mole fraction
pub mod composition_units;
pub mod grid_export;
