//! Case-insensitive names for chip instances and chip types.
//!
//! Both are stored lower-cased, so equality, hashing, and ordering ignore the
//! case the user typed.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates the name, lower-casing it.
            pub fn new(name: impl AsRef<str>) -> Self {
                Self(name.as_ref().to_lowercase())
            }

            /// The lower-cased name.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` for the empty name.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(n: $name) -> String {
                n.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_name!(
    /// Id of a chip instance, unique within the content that holds it.
    ///
    /// The boundary pins of a content graph use the owning type's name as
    /// their chip id.
    ChipId
);

define_name!(
    /// Name of a chip type in the registry.
    TypeName
);

impl TypeName {
    /// The chip id under which this type's own ports appear inside its content.
    pub fn boundary_id(&self) -> ChipId {
        ChipId::new(&self.0)
    }
}

impl ChipId {
    /// Returns `true` if this id refers to the boundary of `owner`.
    pub fn is_boundary_of(&self, owner: &TypeName) -> bool {
        self.0 == owner.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercased() {
        assert_eq!(ChipId::new("AND_1").as_str(), "and_1");
        assert_eq!(TypeName::from("HalfAdder"), TypeName::new("halfadder"));
    }

    #[test]
    fn deserialization_lowercases() {
        let t: TypeName = serde_json::from_str("\"XOR\"").unwrap();
        assert_eq!(t.as_str(), "xor");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"xor\"");
    }

    #[test]
    fn boundary_ids() {
        let owner = TypeName::new("Adder");
        assert!(owner.boundary_id().is_boundary_of(&owner));
        assert!(!ChipId::new("adder_1").is_boundary_of(&owner));
    }
}
