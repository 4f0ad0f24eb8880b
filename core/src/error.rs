use thiserror::Error;

use crate::{Coord, Identity};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Board of {rows}x{cols} has an odd number of cards")]
    OddCardCount { rows: Coord, cols: Coord },
    #[error("Need at least {needed} distinct face images, only {available} available")]
    InsufficientAssets { needed: usize, available: usize },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Identity {0} does not appear exactly twice")]
    UnpairedIdentity(Identity),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Canvas of {width}x{height} is too small for a {rows}x{cols} grid")]
    CanvasTooSmall {
        width: i32,
        height: i32,
        rows: Coord,
        cols: Coord,
    },
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure reading or writing the best-score record.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("score record I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
