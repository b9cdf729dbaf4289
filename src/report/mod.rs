//! Report assembly and rendering.
//!
//! - [`assemble`](mod@assemble): turns merged dependency records into a [`ScanReport`](crate::models::ScanReport).
//! - [`terminal`]: colored, tabular output with summary box; respects `--verbose` / `--quiet`.

pub mod assemble;
pub mod terminal;

pub use assemble::{assemble, MAX_REPORTED_DEPENDENCIES, MAX_REPORTED_ISSUES};
