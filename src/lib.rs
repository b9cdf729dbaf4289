//! License compliance scanning for multi-language projects.
//!
//! A scan looks for known dependency manifests in one directory, parses each
//! with its ecosystem's [`analyzer`], resolves every dependency's license via
//! the [`registry`] clients, classifies the risk with [`license`], and folds
//! the result into a [`models::ScanReport`] with [`report::assemble`].
//! [`server`] exposes the same pipeline over HTTP.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod github;
pub mod license;
pub mod models;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod server;
