// src/config/mod.rs

//! Configuration loading and validation for fabdeck.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like mode/helper consistency (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, DiscoveryMode, DiscoverySection, FabricSection, ProjectSection, RundeckSection};
pub use validate::validate_config;
