//! Placed chip instances.

use crate::const_value::ConstValue;
use crate::ids::{ChipId, TypeName};
use crate::lookup::TypeLookup;
use chipgrid_common::{Rect, Rotation, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_pos() -> Vec2 {
    Vec2::ONE
}

/// One occurrence of a chip type inside a content graph.
///
/// Size, ports, and constant slots are not stored here; they come from the
/// type through a [`TypeLookup`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    /// Unique within the parent content.
    pub id: ChipId,
    /// Display override. Empty means "use the type name".
    #[serde(default)]
    pub name: String,
    /// The chip's type.
    #[serde(rename = "type")]
    pub type_name: TypeName,
    /// Top-left corner on the parent grid.
    #[serde(default = "default_pos")]
    pub pos: Vec2,
    /// Values for the constant slots declared by the type.
    #[serde(default)]
    pub constants: BTreeMap<String, ConstValue>,
    /// Orientation.
    #[serde(default)]
    pub rotation: Rotation,
}

impl Chip {
    /// An unrotated chip with no constants set.
    pub fn new(id: impl Into<ChipId>, type_name: impl Into<TypeName>, pos: Vec2) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            type_name: type_name.into(),
            pos,
            constants: BTreeMap::new(),
            rotation: Rotation::R0,
        }
    }

    /// Builder-style rotation.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// The name shown to users.
    ///
    /// Falls back to the upper-cased type for standard chips and the plain
    /// type name for custom ones.
    pub fn display_name(&self, types: &dyn TypeLookup) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if types.is_standard(&self.type_name) {
            self.type_name.as_str().to_uppercase()
        } else {
            self.type_name.to_string()
        }
    }

    /// Unrotated size of the chip's type.
    pub fn size(&self, types: &dyn TypeLookup) -> Vec2 {
        types.type_data(&self.type_name).size
    }

    /// Cells covered once rotation is applied.
    pub fn footprint(&self, types: &dyn TypeLookup) -> Vec2 {
        self.rotation.footprint(self.size(types))
    }

    /// Bounding rectangle on the parent grid.
    pub fn rect(&self, types: &dyn TypeLookup) -> Rect {
        Rect::from_pos_and_size(self.pos, self.footprint(types))
    }

    /// Overlap area with `other` after padding both rectangles by `pad`.
    pub fn intersects(&self, other: &Rect, pad: f64, types: &dyn TypeLookup) -> f64 {
        self.rect(types).pad(pad).overlap_area(&other.pad(pad))
    }

    /// Overlap area with another chip, both padded by half a cell.
    pub fn intersects_chip(&self, other: &Chip, types: &dyn TypeLookup) -> f64 {
        self.intersects(&other.rect(types), 0.5, types)
    }

    /// Adds `by` quarter turns.
    pub fn rotate(&mut self, by: i32) {
        self.rotation = self.rotation.rotate(by);
    }

    /// Keeps the whole footprint inside a grid of `grid` cells.
    pub fn clamp_to_grid(&mut self, grid: Vec2, types: &dyn TypeLookup) {
        self.pos = self.pos.clamp_vec(Vec2::ZERO, grid - self.footprint(types));
    }

    /// Moves the chip, then clamps it to the grid.
    pub fn set_pos(&mut self, pos: Vec2, grid: Vec2, types: &dyn TypeLookup) {
        self.pos = pos;
        self.clamp_to_grid(grid, types);
    }

    /// Stores a constant value if the type declares the slot.
    pub fn set_constant(&mut self, key: &str, value: ConstValue, types: &dyn TypeLookup) -> bool {
        let key = key.to_uppercase();
        if types.type_data(&self.type_name).constants.contains(&key) {
            self.constants.insert(key, value);
            true
        } else {
            false
        }
    }

    /// Constant values for every slot the type declares, unset ones empty.
    pub fn resolved_constants(&self, types: &dyn TypeLookup) -> BTreeMap<String, ConstValue> {
        types
            .type_data(&self.type_name)
            .constants
            .iter()
            .map(|k| (k.clone(), self.constants.get(k).cloned().unwrap_or_default()))
            .collect()
    }

    /// A copy under a new id, keeping rotation, name, and declared constants.
    pub fn clone_as(&self, id: impl Into<ChipId>, types: &dyn TypeLookup) -> Chip {
        Chip {
            id: id.into(),
            constants: self.resolved_constants(types),
            ..self.clone()
        }
    }
}
