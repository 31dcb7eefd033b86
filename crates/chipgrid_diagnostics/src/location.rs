//! Where in a design a diagnostic points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A chip type and, optionally, an item inside its content.
///
/// Items are chip ids (`and_1`) or connection ids (`and_1.out.R>not_1.in.A`).
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    /// Chip type whose content holds the problem.
    pub chip_type: Option<String>,
    /// Chip or connection id inside that content.
    pub item: Option<String>,
}

impl Location {
    /// A location that points nowhere in particular.
    pub const NONE: Location = Location {
        chip_type: None,
        item: None,
    };

    /// Points at a whole chip type.
    pub fn chip_type(name: impl Into<String>) -> Self {
        Self {
            chip_type: Some(name.into()),
            item: None,
        }
    }

    /// Points at one item inside a chip type.
    pub fn item(chip_type: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            chip_type: Some(chip_type.into()),
            item: Some(item.into()),
        }
    }

    /// Returns `true` if the location carries no information.
    pub fn is_none(&self) -> bool {
        self.chip_type.is_none() && self.item.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.chip_type, &self.item) {
            (Some(t), Some(i)) => write!(f, "{t}::{i}"),
            (Some(t), None) => f.write_str(t),
            (None, Some(i)) => f.write_str(i),
            (None, None) => f.write_str("<design>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Location::item("half_adder", "xor_1").to_string(), "half_adder::xor_1");
        assert_eq!(Location::chip_type("and3").to_string(), "and3");
        assert_eq!(Location::NONE.to_string(), "<design>");
        assert!(Location::NONE.is_none());
    }
}
