//! CLI command implementations

pub mod clear_cache;
pub mod completions;
pub mod config;
pub mod size;

pub use clear_cache::execute as clear_cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use size::execute as size;
