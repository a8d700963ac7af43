//! Client settings loading
//!
//! Settings come from environment variables or a JSON/TOML file; see
//! [`loader`] for the lookup order.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
