//! Configuration management for murmur.
//!
//! Application settings live in a TOML file in the user's config directory;
//! the transcription endpoint address is configuration, not core logic.

pub mod file;

pub use file::{get_config_path, AudioConfig, MurmurConfig, ServiceConfig};
