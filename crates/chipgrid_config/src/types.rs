//! Configuration sections.

use chipgrid_common::Vec2;
use serde::{Deserialize, Serialize};

/// Everything `chipgrid.toml` can set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChipgridConfig {
    /// Chip type editing.
    #[serde(default)]
    pub editor: EditorConfig,
    /// Connection routing costs.
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Compiler behaviour.
    #[serde(default)]
    pub compile: CompileConfig,
    /// Where custom chip types are kept.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Settings for editing chip types and their content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Grid cells per unit of chip size.
    pub scale_factor: i32,
    /// Upper bound on the size of the base chip type.
    pub base_max_size: Vec2,
    /// The type every other type must fit inside.
    pub base_chip: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scale_factor: 4,
            base_max_size: Vec2::new(1000, 1000),
            base_chip: "base".to_string(),
        }
    }
}

/// Cost grid parameters for the auto-router.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Cells at or above this cost cannot be entered.
    pub max_cost: u32,
    /// Cost of the stand-off cell in front of each pin.
    pub pin_cost: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_cost: 10,
            pin_cost: 9,
        }
    }
}

/// Compiler knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Rounds of score propagation when ordering chips.
    pub relaxation_rounds: u32,
    /// Score given to chips fed by another chip.
    pub seed_score: u64,
    /// Emit a comment above each chip block.
    pub debug: bool,
    /// Directory with `chip.jinja` / `program.jinja` overriding the built-in ones.
    pub templates: Option<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            relaxation_rounds: 10,
            seed_score: 10,
            debug: false,
            templates: None,
        }
    }
}

/// On-disk store for custom chip types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one JSON file per type.
    pub dir: String,
    /// File name prefix placed before the type name.
    pub prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: ".chipgrid/types".to_string(),
            prefix: "CHIP_DESIGNER_TYPES_".to_string(),
        }
    }
}
