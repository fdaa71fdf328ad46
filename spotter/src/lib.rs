//! # Spotting
//!
//! `spotter` turns a resolved target into directions for someone on
//! the ground: bearing, range and look angle from an observer, with
//! optional aim-point adjustments.

mod dms;
mod error;
pub mod solution;

pub use {
    crate::{
        dms::Dms,
        error::SpotterError,
        solution::{FireSolution, FireSolutionBuilder},
    },
    geo, terrain,
};
