//! License risk classification.
//!
//! - [`classifier`]: maps a free-text license string to a [`RiskLevel`](crate::models::RiskLevel).

pub mod classifier;

pub use classifier::classify;
