//! Wires between two pins and their routed paths.

use crate::ids::ChipId;
use crate::pin::Pin;
use chipgrid_common::{Line, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a connection: its source and target pins.
///
/// Structural rather than a joined string, so separators inside chip or port
/// names cannot make two different wires collide.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ConnectionId {
    /// The driving pin.
    pub source: Pin,
    /// The driven pin.
    pub target: Pin,
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.source, self.target)
    }
}

fn valid_default() -> bool {
    true
}

/// A directed wire from a driving pin to a driven pin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Routing domain. Wires only block wires on the same layer.
    #[serde(default)]
    pub layer: i32,
    /// Routed grid cells from source to target.
    #[serde(default)]
    pub path: Vec<Vec2>,
    /// The driver.
    pub source: Pin,
    /// The driven pin.
    pub target: Pin,
    /// Set when the user drew the path by hand; such wires are not re-routed
    /// by a global update.
    #[serde(rename = "customPath", default)]
    pub custom_path: bool,
    /// Whether the last routing attempt succeeded.
    #[serde(rename = "validPath", default = "valid_default")]
    pub valid_path: bool,
}

impl Connection {
    /// An unrouted connection.
    pub fn new(source: Pin, target: Pin, layer: i32) -> Self {
        Self {
            layer,
            path: Vec::new(),
            source,
            target,
            custom_path: false,
            valid_path: true,
        }
    }

    /// The connection's identity.
    pub fn id(&self) -> ConnectionId {
        ConnectionId {
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }

    /// Returns `true` if either end sits on `chip`.
    pub fn uses_chip(&self, chip: &ChipId) -> bool {
        &self.source.chip == chip || &self.target.chip == chip
    }

    /// Returns `true` if either end is `pin`.
    pub fn uses_pin(&self, pin: &Pin) -> bool {
        &self.source == pin || &self.target == pin
    }

    /// Consecutive path cells as segments.
    pub fn path_lines(&self) -> Vec<Line> {
        self.path.windows(2).map(|w| Line::new(w[0], w[1])).collect()
    }

    /// Returns `true` if any path segment touches `rect`.
    ///
    /// A one-cell path has no segments, so its single cell is tested instead.
    pub fn path_intersects_rect(&self, rect: &Rect) -> bool {
        match self.path.as_slice() {
            [only] => rect.contains(f64::from(only.x), f64::from(only.y)),
            _ => self.path_lines().iter().any(|l| l.intersects_rect(rect)),
        }
    }

    /// Clears the routed path ahead of re-routing.
    pub fn clear_path(&mut self) {
        self.path.clear();
        self.valid_path = false;
    }
}
