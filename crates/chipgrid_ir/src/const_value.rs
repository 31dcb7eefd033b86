//! Values stored in a chip instance's constant slots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A number or a string, as typed into a chip's constant field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    /// A numeric constant.
    Number(serde_json::Number),
    /// A text constant. The empty string marks an unset slot.
    Text(String),
}

impl ConstValue {
    /// The value of a slot nobody filled in.
    pub fn unset() -> Self {
        ConstValue::Text(String::new())
    }

    /// Returns `true` for the empty text value.
    pub fn is_unset(&self) -> bool {
        matches!(self, ConstValue::Text(s) if s.is_empty())
    }

    /// Parses user input: anything that reads as a JSON number is a number.
    pub fn parse(input: &str) -> Self {
        match serde_json::from_str::<serde_json::Number>(input.trim()) {
            Ok(n) => ConstValue::Number(n),
            Err(_) => ConstValue::Text(input.to_string()),
        }
    }

    /// The value as a literal in generated program text.
    pub fn to_literal(&self) -> String {
        match self {
            ConstValue::Number(n) => n.to_string(),
            ConstValue::Text(s) => serde_json::Value::String(s.clone()).to_string(),
        }
    }
}

impl Default for ConstValue {
    fn default() -> Self {
        Self::unset()
    }
}

impl From<i64> for ConstValue {
    fn from(n: i64) -> Self {
        ConstValue::Number(n.into())
    }
}

impl From<&str> for ConstValue {
    fn from(s: &str) -> Self {
        ConstValue::Text(s.to_string())
    }
}

/// Displays the raw value: numbers as written, text without quotes.
impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Number(n) => write!(f, "{n}"),
            ConstValue::Text(s) => f.write_str(s),
        }
    }
}
