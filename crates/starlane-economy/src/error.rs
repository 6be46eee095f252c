use crate::config::ConfigError;

/// Failure to assemble the admittance matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("self resistance must be finite and positive, got {0}")]
    SelfResistance(f64),
    #[error("matrix entry ({row}, {col}) out of bounds for dimension {dim}")]
    OutOfBounds { row: usize, col: usize, dim: usize },
}

/// Failure of a single linear solve. Never fatal to an update pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("right-hand side has length {got}, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("matrix was not factorized: {0}")]
    NotFactorized(String),
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Errors surfaced by the economy scheduler.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    #[error("invalid economy config: {0}")]
    Config(#[from] ConfigError),
    #[error("admittance matrix build failed: {0}")]
    MatrixBuild(#[from] BuildError),
}
