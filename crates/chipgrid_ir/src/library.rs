//! The bundled catalogue of standard chips.

use crate::ids::TypeName;
use crate::type_data::ChipTypeData;
use chipgrid_common::{ChipResult, InternalError};
use std::collections::BTreeMap;

/// Raw catalogue text, keyed by type name.
pub const STANDARD_LIBRARY_JSON: &str = include_str!("../library/standard_chips.json");

/// Parses the bundled catalogue into sanitized definitions.
pub fn standard_library() -> ChipResult<BTreeMap<TypeName, ChipTypeData>> {
    let raw: BTreeMap<String, ChipTypeData> = serde_json::from_str(STANDARD_LIBRARY_JSON)
        .map_err(|e| InternalError::new(format!("bundled standard chip library is malformed: {e}")))?;
    Ok(raw
        .into_iter()
        .map(|(name, data)| (TypeName::new(name), data.sanitized()))
        .collect())
}
