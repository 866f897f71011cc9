use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Row and column counts must be at least {}", crate::MIN_DIMENSION)]
    InvalidDimension,
    #[error("Mine count must be positive and less than the number of cells")]
    InvalidMineCount,
    #[error("Coordinates or index outside of the grid")]
    OutOfRange,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Expected \"rows, columns[, mines]\"")]
    InvalidConfig,
}

pub type Result<T> = core::result::Result<T, GameError>;
