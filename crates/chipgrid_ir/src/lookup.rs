//! The seam through which chips see their type definitions.

use crate::ids::TypeName;
use crate::type_data::ChipTypeData;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Read access to chip type definitions.
///
/// A chip instance stores only its type name; size, ports, and constant slots
/// are always fetched live through this trait.
pub trait TypeLookup {
    /// Definition of `name`, or the default skeleton if it is unknown.
    fn type_data(&self, name: &TypeName) -> Cow<'_, ChipTypeData>;

    /// Returns `true` if `name` is a built-in type with inline code.
    fn is_standard(&self, name: &TypeName) -> bool;
}

impl TypeLookup for BTreeMap<TypeName, ChipTypeData> {
    fn type_data(&self, name: &TypeName) -> Cow<'_, ChipTypeData> {
        match self.get(name) {
            Some(data) => Cow::Borrowed(data),
            None => Cow::Owned(ChipTypeData::skeleton()),
        }
    }

    fn is_standard(&self, name: &TypeName) -> bool {
        self.get(name).is_some_and(|d| d.inline_code().is_some())
    }
}
