//! Loading and validation of `chipgrid.toml`.
//!
//! Every section is optional. A missing file means [`ChipgridConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_config_or_default, CONFIG_FILE};
pub use types::*;
