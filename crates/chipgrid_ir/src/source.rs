//! The compiler's input document.
//!
//! ```json
//! { "chip": { "id": ..., "name": ..., "type": ..., "constants": {} },
//!   "chipData": { "<type>": { "inputs": [], "outputs": [], "constants": [],
//!                             "content": { "chips": [], "connections": [] } } } }
//! ```

use crate::chip::Chip;
use crate::ids::TypeName;
use crate::type_data::ChipTypeData;
use chipgrid_common::MAX_TYPE_SIZE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A root chip plus the definitions of every type it may reach.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChipSource {
    /// The chip being compiled.
    pub chip: Chip,
    /// Type definitions by name.
    #[serde(rename = "chipData")]
    pub chip_data: BTreeMap<TypeName, ChipTypeData>,
}

/// Why a document was rejected before compilation.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Not JSON at all.
    #[error("chip source is not valid JSON: {0}")]
    Json(String),

    /// JSON, but a required field is missing or has the wrong type.
    #[error("chip source is malformed: {path} {problem}")]
    Shape {
        /// Dotted path to the offending value.
        path: String,
        /// What is wrong with it.
        problem: &'static str,
    },
}

impl ChipSource {
    /// Parses and structurally checks a chip source document.
    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        let value: Value = serde_json::from_str(text).map_err(|e| SourceError::Json(e.to_string()))?;
        Self::from_value(value)
    }

    /// Structurally checks an already parsed document, then converts it.
    pub fn from_value(value: Value) -> Result<Self, SourceError> {
        check_source(&value)?;
        serde_json::from_value(value).map_err(|e| SourceError::Json(e.to_string()))
    }

    /// Pretty JSON for writing to disk.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn shape(path: impl Into<String>, problem: &'static str) -> SourceError {
    SourceError::Shape {
        path: path.into(),
        problem,
    }
}

fn field<'a>(obj: &'a Value, path: &str, key: &str) -> Result<&'a Value, SourceError> {
    obj.get(key).ok_or_else(|| shape(format!("{path}.{key}"), "is missing"))
}

fn object<'a>(obj: &'a Value, path: &str, key: &str) -> Result<&'a serde_json::Map<String, Value>, SourceError> {
    field(obj, path, key)?
        .as_object()
        .ok_or_else(|| shape(format!("{path}.{key}"), "must be an object"))
}

fn array<'a>(obj: &'a Value, path: &str, key: &str) -> Result<&'a Vec<Value>, SourceError> {
    field(obj, path, key)?
        .as_array()
        .ok_or_else(|| shape(format!("{path}.{key}"), "must be an array"))
}

fn string(obj: &Value, path: &str, key: &str) -> Result<(), SourceError> {
    match field(obj, path, key)? {
        Value::String(_) => Ok(()),
        _ => Err(shape(format!("{path}.{key}"), "must be a string")),
    }
}

fn string_array(obj: &Value, path: &str, key: &str) -> Result<(), SourceError> {
    let items = array(obj, path, key)?;
    match items.iter().position(|v| !v.is_string()) {
        None => Ok(()),
        Some(i) => Err(shape(format!("{path}.{key}[{i}]"), "must be a string")),
    }
}

fn check_pin(pin: &Value, path: &str) -> Result<(), SourceError> {
    if !pin.is_object() {
        return Err(shape(path, "must be an object"));
    }
    string(pin, path, "chip")?;
    string(pin, path, "name")?;
    match field(pin, path, "output")? {
        Value::Bool(_) => Ok(()),
        _ => Err(shape(format!("{path}.output"), "must be a boolean")),
    }
}

fn check_size(size: &Value, path: &str) -> Result<(), SourceError> {
    if !size.is_object() {
        return Err(shape(path, "must be an object"));
    }
    for (key, max) in [("x", MAX_TYPE_SIZE.x), ("y", MAX_TYPE_SIZE.y)] {
        let in_range = field(size, path, key)?
            .as_i64()
            .is_some_and(|v| (1..=i64::from(max)).contains(&v));
        if !in_range {
            return Err(shape(format!("{path}.{key}"), "must be an integer from 1 to 1000"));
        }
    }
    Ok(())
}

fn check_source(value: &Value) -> Result<(), SourceError> {
    if !value.is_object() {
        return Err(shape("<root>", "must be an object"));
    }
    let chip = field(value, "<root>", "chip")?;
    if !chip.is_object() {
        return Err(shape("chip", "must be an object"));
    }
    for key in ["id", "name", "type"] {
        string(chip, "chip", key)?;
    }
    object(chip, "chip", "constants")?;

    for (name, data) in object(value, "<root>", "chipData")? {
        let path = format!("chipData.{name}");
        if !data.is_object() {
            return Err(shape(path, "must be an object"));
        }
        if let Some(size) = data.get("size") {
            check_size(size, &format!("{path}.size"))?;
        }
        for key in ["inputs", "outputs", "constants"] {
            string_array(data, &path, key)?;
        }
        let content_path = format!("{path}.content");
        let content = field(data, &path, "content")?;
        if !content.is_object() {
            return Err(shape(content_path, "must be an object"));
        }
        array(content, &content_path, "chips")?;
        for (i, con) in array(content, &content_path, "connections")?.iter().enumerate() {
            let con_path = format!("{content_path}.connections[{i}]");
            check_pin(field(con, &con_path, "source")?, &format!("{con_path}.source"))?;
            check_pin(field(con, &con_path, "target")?, &format!("{con_path}.target"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "chip": { "id": "top", "name": "", "type": "top", "constants": {} },
            "chipData": {
                "top": {
                    "size": { "x": 1, "y": 1 },
                    "inputs": ["A", ""],
                    "outputs": ["R", ""],
                    "constants": [],
                    "content": {
                        "chips": [{ "id": "n", "type": "not", "pos": { "x": 1, "y": 1 } }],
                        "connections": [{
                            "source": { "chip": "top", "output": false, "name": "A" },
                            "target": { "chip": "n", "output": false, "name": "A" }
                        }]
                    }
                }
            }
        })
    }

    #[test]
    fn accepts_well_formed_source() {
        let src = ChipSource::from_value(minimal()).unwrap();
        assert_eq!(src.chip.type_name, TypeName::new("top"));
        let top = &src.chip_data[&TypeName::new("top")];
        assert_eq!(top.content.connections.len(), 1);
        assert_eq!(top.content.chips.len(), 1);
    }

    #[test]
    fn rejects_missing_content() {
        let mut v = minimal();
        v["chipData"]["top"].as_object_mut().unwrap().remove("content");
        let err = ChipSource::from_value(v).unwrap_err();
        assert_eq!(err.to_string(), "chip source is malformed: chipData.top.content is missing");
    }

    #[test]
    fn rejects_non_boolean_pin_side() {
        let mut v = minimal();
        v["chipData"]["top"]["content"]["connections"][0]["target"]["output"] = json!("no");
        let err = ChipSource::from_value(v).unwrap_err();
        assert!(err
            .to_string()
            .contains("chipData.top.content.connections[0].target.output must be a boolean"));
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        for (x, y, bad) in [(2_000_000_000, 1, "x"), (2, -7, "y"), (0, 3, "x"), (1001, 1, "x")] {
            let mut v = minimal();
            v["chipData"]["top"]["size"] = json!({ "x": x, "y": y });
            let err = ChipSource::from_value(v).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("chip source is malformed: chipData.top.size.{bad} must be an integer from 1 to 1000")
            );
        }
    }

    #[test]
    fn rejects_fractional_size() {
        let mut v = minimal();
        v["chipData"]["top"]["size"] = json!({ "x": 1.5, "y": 1 });
        assert!(matches!(ChipSource::from_value(v), Err(SourceError::Shape { .. })));

        let mut v = minimal();
        v["chipData"]["top"]["size"] = json!([1, 1]);
        assert!(matches!(ChipSource::from_value(v), Err(SourceError::Shape { .. })));
    }

    #[test]
    fn rejects_non_string_port() {
        let mut v = minimal();
        v["chipData"]["top"]["inputs"] = json!(["A", 3]);
        assert!(matches!(ChipSource::from_value(v), Err(SourceError::Shape { .. })));
    }

    #[test]
    fn rejects_garbage_text() {
        assert!(matches!(ChipSource::from_json("{nope"), Err(SourceError::Json(_))));
    }

    #[test]
    fn text_round_trip() {
        let src = ChipSource::from_value(minimal()).unwrap();
        let again = ChipSource::from_json(&src.to_json()).unwrap();
        assert_eq!(src, again);
    }
}
