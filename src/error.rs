use thiserror::Error;

use crate::species::Species;

/// Reasons a run can fail. All of them are raised before the first trial move.
#[derive(Debug, Error, PartialEq)]
pub enum HdmcError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Lattice does not fit in the periodic cell: blocks need {needed:.4} area but the cell only has {available:.4}")]
    LatticeOverflow { needed: f64, available: f64 },

    #[error("Initial lattice has an overlap at {species:?} particle {index}")]
    LatticeOverlap { species: Species, index: usize },
}

pub type Result<T> = std::result::Result<T, HdmcError>;
