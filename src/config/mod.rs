// src/config/mod.rs

//! Configuration for gcalcron.
//!
//! Responsibilities:
//! - Define the immutable runtime settings and the optional TOML override
//!   model (`model.rs`).
//! - Layer an override file over compiled-in defaults (`loader.rs`).
//! - Validate the result once, before anything runs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{build_settings, home_dir, load_from_path, load_settings};
pub use model::{CALENDAR_SCOPE, RawSettings, Settings};
pub use validate::validate_settings;
