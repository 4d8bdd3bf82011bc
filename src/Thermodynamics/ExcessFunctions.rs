/// mole fractions of the binary mixture and the floored logarithm
pub mod composition;
/// Q = -G^(e)/RT as a nested double sum over species
pub mod excess_functional;
/// weighting policies, log index and normalization of a model hypothesis
pub mod model_variant;
/// numerical differentiation of Q and the partial molar properties
pub mod partial_molar;
