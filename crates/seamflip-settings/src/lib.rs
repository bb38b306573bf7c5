//! seamflip Settings Crate
//!
//! Loads, validates and saves the settings file used by the `seamflip` binary.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, ProcessingOptions, UnterminatedBlockPolicy};
pub use error::{SettingsError, SettingsResult};
