// src/config/mod.rs

//! Pattern / option types, TOML loading and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    ConfigFile, FromSpec, GlobalOptions, IgnoreSpec, OptionsSection, Pattern, RawConfigFile,
    ToType,
};
pub use validate::validate_patterns;
