//! gobi - build-info for Go modules
//!
//! Runs the go command for a module and records its dependencies, the
//! checksums of their cached archives and the chains of modules that
//! required each one.

pub mod build_info;
pub mod cli;
pub mod config;
pub mod error;
pub mod module;
pub mod ui;

pub use error::{GobiError, GobiResult};
