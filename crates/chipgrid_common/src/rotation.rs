//! Quarter-turn rotation of chips and the pin placement derived from it.
//!
//! Every chip is laid out in an unrotated local frame: input pin `i` sits at
//! `(i, 0)` on the top edge facing up, output pin `i` sits at `(i, h)` on the
//! bottom edge facing down. A rotation applies `n` clockwise quarter turns to
//! that frame, each mapping `(x, y)` to `(h - y, x)` and swapping the extent.
//! Pin anchors, stand-off cells, and footprints all come from this one
//! transform so they cannot disagree.

use crate::geom::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation of a placed chip, in clockwise quarter turns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Rotation {
    /// Inputs on top, outputs on the bottom.
    #[default]
    R0,
    /// Inputs on the right, outputs on the left.
    R1,
    /// Inputs on the bottom, outputs on top.
    R2,
    /// Inputs on the left, outputs on the right.
    R3,
}

impl Rotation {
    /// Number of clockwise quarter turns, `0..=3`.
    pub fn quarter_turns(self) -> i32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R1 => 1,
            Rotation::R2 => 2,
            Rotation::R3 => 3,
        }
    }

    /// Adds `by` quarter turns, wrapping in both directions.
    pub fn rotate(self, by: i32) -> Self {
        Self::from(self.quarter_turns() + by)
    }

    /// `true` for odd rotations, where width and height trade places.
    pub fn is_transposed(self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    /// Grid extent occupied by a chip of unrotated `size`.
    pub fn footprint(self, size: Vec2) -> Vec2 {
        if self.is_transposed() {
            size.swap()
        } else {
            size
        }
    }

    /// Maps a point from the unrotated local frame of a `size` chip into the
    /// rotated frame, relative to the chip's top-left corner.
    pub fn transform_point(self, local: Vec2, size: Vec2) -> Vec2 {
        let mut p = local;
        let mut extent = size;
        for _ in 0..self.quarter_turns() {
            p = Vec2::new(extent.y - p.y, p.x);
            extent = extent.swap();
        }
        p
    }

    /// Rotates a direction vector.
    pub fn transform_dir(self, dir: Vec2) -> Vec2 {
        (0..self.quarter_turns()).fold(dir, |d, _| Vec2::new(-d.y, d.x))
    }

    /// Offset of pin `index` from the chip's top-left corner, together with
    /// the unit vector pointing away from the chip body.
    pub fn pin_offset(self, size: Vec2, index: usize, output: bool) -> (Vec2, Vec2) {
        let i = i32::try_from(index).unwrap_or(i32::MAX);
        let (local, normal) = if output {
            (Vec2::new(i, size.y), Vec2::new(0, 1))
        } else {
            (Vec2::new(i, 0), Vec2::new(0, -1))
        };
        (self.transform_point(local, size), self.transform_dir(normal))
    }
}

impl From<i32> for Rotation {
    fn from(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::R0,
            1 => Rotation::R1,
            2 => Rotation::R2,
            _ => Rotation::R3,
        }
    }
}

impl From<Rotation> for i32 {
    fn from(r: Rotation) -> i32 {
        r.quarter_turns()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quarter_turns() * 90)
    }
}
