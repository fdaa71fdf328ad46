use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid HGT name {0}")]
    HgtName(PathBuf),

    #[error("invalid HGT file len {0} for {1}")]
    HgtLen(u64, PathBuf),

    #[error("invalid {axis} spacing {spacing} for {len} posts")]
    Spacing {
        axis: &'static str,
        spacing: f64,
        len: usize,
    },

    #[error("invalid {axis} origin {origin}")]
    Origin { axis: &'static str, origin: f64 },

    #[error("expected {expected} samples for grid, got {actual}")]
    Dimensions { expected: usize, actual: usize },

    #[error("elevation grid has no samples")]
    Empty,
}
