//! Reading `chipgrid.toml` from disk or a string.

use crate::error::ConfigError;
use crate::types::ChipgridConfig;
use chipgrid_common::MAX_TYPE_SIZE;
use std::path::Path;

/// File name looked up inside a project directory.
pub const CONFIG_FILE: &str = "chipgrid.toml";

/// Reads and validates `<dir>/chipgrid.toml`.
pub fn load_config(dir: &Path) -> Result<ChipgridConfig, ConfigError> {
    let content = std::fs::read_to_string(dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(dir: &Path) -> Result<ChipgridConfig, ConfigError> {
    match load_config(dir) {
        Err(ConfigError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(ChipgridConfig::default())
        }
        other => other,
    }
}

/// Parses and validates configuration text.
pub fn load_config_from_str(content: &str) -> Result<ChipgridConfig, ConfigError> {
    let config: ChipgridConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ChipgridConfig) -> Result<(), ConfigError> {
    let invalid = |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::ValidationError(msg.to_string())) };

    if config.editor.scale_factor < 1 {
        return invalid("editor.scale_factor must be at least 1");
    }
    let max = config.editor.base_max_size;
    if max.x < 1 || max.y < 1 {
        return invalid("editor.base_max_size components must be at least 1");
    }
    if max.x > MAX_TYPE_SIZE.x || max.y > MAX_TYPE_SIZE.y {
        return invalid("editor.base_max_size components must be at most 1000");
    }
    if config.editor.base_chip.trim().is_empty() {
        return invalid("editor.base_chip must not be empty");
    }
    if config.routing.pin_cost >= config.routing.max_cost {
        return invalid("routing.pin_cost must be below routing.max_cost");
    }
    if config.compile.relaxation_rounds < 1 {
        return invalid("compile.relaxation_rounds must be at least 1");
    }
    Ok(())
}
