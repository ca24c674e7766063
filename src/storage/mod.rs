//! # Storage Layer
//!
//! Everything between raw bytes and the domain model.
//!
//! | Concern | Module | Format |
//! |---------|--------|--------|
//! | Documents | [`serializer`] | JSON, camelCase keys, absent fields omitted |
//! | Source files | [`DocumentFile`] | path or `-` for stdin |
//! | Config | [`Config`] | TOML (`timeline.toml`, global `config.toml`) |
//!
//! ## Concurrency Safety
//!
//! - [`DocumentFile`] takes `fs2` locks while reading and writing
//! - Write-back is atomic (temp file + rename)

pub mod serializer;
mod file;
mod config;

pub use file::{DocumentFile, STDIN_PATH};
pub use config::{
    Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, RenderConfig, WatchConfig,
    PROJECT_CONFIG_FILE,
};
pub use serializer::SerializerError;
