//! Chip type definitions and their canonical form.

use crate::content::ChipContent;
use chipgrid_common::{Vec2, MAX_TYPE_SIZE};
use serde::{Deserialize, Serialize};

/// Category recorded for user-defined types.
pub const CUSTOM_KIND: &str = "custom";

/// Everything shared by the instances of one chip type.
///
/// `inputs` and `outputs` are positional: index `i` is the pin at column `i`
/// along the chip's edge, and an empty name is an unused position. Standard
/// types carry `code`; custom types carry `content` instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TypeDataRecord", into = "TypeDataRecord")]
pub struct ChipTypeData {
    /// Width and height in type units.
    pub size: Vec2,
    /// Input port names by position.
    pub inputs: Vec<String>,
    /// Output port names by position.
    pub outputs: Vec<String>,
    /// Constant slot names.
    pub constants: Vec<String>,
    /// Child graph of a custom type.
    pub content: ChipContent,
    /// Inline code template of a standard type.
    pub code: Option<String>,
    /// Category, `custom` for user types.
    pub kind: String,
    /// Free text.
    pub description: String,
}

impl ChipTypeData {
    /// The definition handed out for unknown type names.
    pub fn skeleton() -> Self {
        Self {
            size: Vec2::ONE,
            inputs: vec!["A".into(), "B".into()],
            outputs: vec!["R".into(), String::new()],
            constants: Vec::new(),
            content: ChipContent::new(Vec2::ONE),
            code: None,
            kind: CUSTOM_KIND.into(),
            description: String::new(),
        }
    }

    /// The inline code template, if this type has a non-empty one.
    pub fn inline_code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }

    /// Returns `true` when instances must be compiled from `content`.
    pub fn is_composite(&self) -> bool {
        self.inline_code().is_none()
    }

    /// Port names on one side.
    pub fn ports(&self, output: bool) -> &[String] {
        if output {
            &self.outputs
        } else {
            &self.inputs
        }
    }

    /// Position of the named port on one side.
    pub fn pin_index(&self, name: &str, output: bool) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.ports(output).iter().position(|p| p == name)
    }

    /// Non-empty port names on one side, in position order.
    pub fn named_ports(&self, output: bool) -> impl Iterator<Item = &str> {
        self.ports(output).iter().map(String::as_str).filter(|p| !p.is_empty())
    }

    /// Brings the definition into canonical form.
    ///
    /// The size is kept within `1..=MAX_TYPE_SIZE`. Port lists get exactly
    /// `size.x + 1` entries and upper-case names. Constants are upper-cased,
    /// stripped of blanks, and de-duplicated keeping the first occurrence. The
    /// content is resized to match. Applying it twice changes nothing.
    pub fn sanitize(&mut self) {
        self.size = self.size.clamp_vec(Vec2::ONE, MAX_TYPE_SIZE);
        let len = usize::try_from(self.size.x.max(0)).unwrap_or(0) + 1;
        for ports in [&mut self.inputs, &mut self.outputs] {
            ports.resize(len, String::new());
            for p in ports.iter_mut() {
                *p = p.trim().to_uppercase();
            }
        }

        let mut constants: Vec<String> = Vec::with_capacity(self.constants.len());
        for c in &self.constants {
            let c = c.trim().to_uppercase();
            if !c.is_empty() && !constants.contains(&c) {
                constants.push(c);
            }
        }
        self.constants = constants;
        self.content.size = self.size;
    }

    /// Consuming form of [`sanitize`](Self::sanitize).
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}

impl Default for ChipTypeData {
    fn default() -> Self {
        Self::skeleton()
    }
}

fn one() -> Vec2 {
    Vec2::ONE
}

fn custom_kind() -> String {
    CUSTOM_KIND.into()
}

/// The stored form: `{ size, inputs, outputs, type, constants, content, description, code }`.
#[derive(Clone, Serialize, Deserialize)]
struct TypeDataRecord {
    #[serde(default = "one")]
    size: Vec2,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(rename = "type", default = "custom_kind")]
    kind: String,
    #[serde(default)]
    constants: Vec<String>,
    #[serde(default)]
    content: ChipContent,
    #[serde(default)]
    description: String,
    #[serde(default)]
    code: Option<String>,
}

impl From<TypeDataRecord> for ChipTypeData {
    fn from(r: TypeDataRecord) -> Self {
        let mut content = r.content;
        content.size = r.size;
        Self {
            size: r.size,
            inputs: r.inputs,
            outputs: r.outputs,
            constants: r.constants,
            content,
            code: r.code,
            kind: r.kind,
            description: r.description,
        }
    }
}

impl From<ChipTypeData> for TypeDataRecord {
    fn from(d: ChipTypeData) -> Self {
        Self {
            size: d.size,
            inputs: d.inputs,
            outputs: d.outputs,
            kind: d.kind,
            constants: d.constants,
            content: d.content,
            description: d.description,
            code: d.code,
        }
    }
}
