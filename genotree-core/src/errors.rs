use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Invalid interval bounds: low ({low}) is greater than high ({high})")]
    InvalidBounds { low: u128, high: u128 },

    #[error("Region has no positions and cannot be indexed: {0}")]
    EmptyRegion(String),
}
