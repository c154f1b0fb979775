//! CLI command implementations

pub mod artifacts;
pub mod clean;
pub mod config;
pub mod go;
pub mod show;

pub use artifacts::execute as artifacts;
pub use clean::execute as clean;
pub use config::execute as config;
pub use go::execute as go;
pub use show::execute as show;
