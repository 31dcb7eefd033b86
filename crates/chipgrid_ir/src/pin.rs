//! Pins: one end of a wire.

use crate::ids::ChipId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named port on a chip. Two pins are equal when chip, side, and name all match.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Pin {
    /// Chip the port belongs to.
    pub chip: ChipId,
    /// `true` for an output port of the chip.
    #[serde(default)]
    pub output: bool,
    /// Port name, upper-cased.
    #[serde(default)]
    pub name: String,
}

impl Pin {
    /// Creates a pin, upper-casing the port name.
    pub fn new(chip: impl Into<ChipId>, output: bool, name: impl AsRef<str>) -> Self {
        Self {
            chip: chip.into(),
            output,
            name: name.as_ref().to_uppercase(),
        }
    }

    /// Input port `name` of `chip`.
    pub fn input(chip: impl Into<ChipId>, name: impl AsRef<str>) -> Self {
        Self::new(chip, false, name)
    }

    /// Output port `name` of `chip`.
    pub fn output(chip: impl Into<ChipId>, name: impl AsRef<str>) -> Self {
        Self::new(chip, true, name)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = if self.output { "out" } else { "in" };
        write!(f, "{}.{}.{}", self.chip, side, self.name)
    }
}

/// A pin reference that is not of the form `chip.in.NAME` / `chip.out.NAME`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid pin `{0}`: expected <chip>.in.<NAME> or <chip>.out.<NAME>")]
pub struct PinParseError(pub String);

impl FromStr for Pin {
    type Err = PinParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PinParseError(s.to_string());
        let (rest, name) = s.rsplit_once('.').ok_or_else(err)?;
        let (chip, side) = rest.rsplit_once('.').ok_or_else(err)?;
        let output = match side.to_ascii_lowercase().as_str() {
            "in" | "i" | "input" => false,
            "out" | "o" | "output" => true,
            _ => return Err(err()),
        };
        if chip.is_empty() || name.is_empty() {
            return Err(err());
        }
        Ok(Pin::new(chip, output, name))
    }
}
