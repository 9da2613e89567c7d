//! TOML plan files: the CLI-facing description of edit sessions.

pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError};
pub use schema::{EditDefinition, Metadata, PlanConfig, SessionDefinition, ValidationError};
