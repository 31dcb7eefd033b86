//! The child-chip graph inside a custom chip type.

use crate::chip::Chip;
use crate::connection::Connection;
use crate::ids::ChipId;
use crate::pin::Pin;
use chipgrid_common::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Child chips and the wires between them.
///
/// `size` mirrors the owning type's size in type units; the routing grid is
/// `size * scale_factor` cells. The serialized form carries only `chips` and
/// `connections`, the size is restored from the owning type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ContentRecord", into = "ContentRecord")]
pub struct ChipContent {
    /// Size of the owning type.
    pub size: Vec2,
    /// Children by id.
    pub chips: BTreeMap<ChipId, Chip>,
    /// Wires, in creation order.
    pub connections: Vec<Connection>,
}

impl Default for ChipContent {
    fn default() -> Self {
        Self::new(Vec2::ONE)
    }
}

impl ChipContent {
    /// Empty content for a type of `size`.
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            chips: BTreeMap::new(),
            connections: Vec::new(),
        }
    }

    /// Routing grid extent.
    pub fn grid_size(&self, scale: i32) -> Vec2 {
        self.size * scale
    }

    /// Returns `true` when there are no chips and no wires.
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty() && self.connections.is_empty()
    }

    /// Looks up a child chip.
    pub fn chip(&self, id: &ChipId) -> Option<&Chip> {
        self.chips.get(id)
    }

    /// Wires with an end on `chip`.
    pub fn connections_for_chip<'a>(&'a self, chip: &'a ChipId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.uses_chip(chip))
    }

    /// Wires with an end on `pin`.
    pub fn connections_for_pin<'a>(&'a self, pin: &'a Pin) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.uses_pin(pin))
    }

    /// Child chips that take part in at least one wire, in id order.
    pub fn connected_chips(&self) -> impl Iterator<Item = &Chip> {
        self.chips
            .values()
            .filter(move |chip| self.connections.iter().any(|c| c.uses_chip(&chip.id)))
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct ContentRecord {
    #[serde(default)]
    chips: Vec<Chip>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl From<ContentRecord> for ChipContent {
    fn from(record: ContentRecord) -> Self {
        Self {
            size: Vec2::ONE,
            chips: record.chips.into_iter().map(|c| (c.id.clone(), c)).collect(),
            connections: record.connections,
        }
    }
}

impl From<ChipContent> for ContentRecord {
    fn from(content: ChipContent) -> Self {
        Self {
            chips: content.chips.into_values().collect(),
            connections: content.connections,
        }
    }
}
