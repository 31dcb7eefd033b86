//! Code generation for the children of one custom type.
//!
//! Every wire becomes `<target var> = <source var>;`. Wires leaving the
//! type's own inputs go into a preamble block; the rest follow the child that
//! drives them. Standard children contribute their rendered inline code,
//! custom children a call to the object built for them in the constructor.

use crate::compiler::CompileSettings;
use crate::error::CompileError;
use crate::ident::{chip_object, constant_var, input_var, output_var, pin_var, type_class};
use crate::order::{outputs_of, ChipOrder};
use crate::templates::Templates;
use chipgrid_common::InternalError;
use chipgrid_ir::{Chip, ChipContent, ChipId, ChipTypeData, Connection, TypeLookup, TypeName};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A constant bound to a literal at the top of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantVar {
    /// Variable name, `C_<chip>_<NAME>`.
    pub name: String,
    /// Literal value.
    pub value: String,
}

/// A custom child, built once per instance of the owning type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomChip {
    /// Child id.
    pub id: String,
    /// Field holding the child's object.
    pub var: String,
    /// Class of the child's type.
    pub class: String,
    /// Child type name.
    pub chip_type: String,
    /// Constant variables passed to the child's constructor.
    pub constants: Vec<String>,
}

/// Statements emitted for one child, or for the input preamble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Type of the child.
    pub chip_type: String,
    /// Child id.
    pub id: String,
    /// What the block does.
    pub description: String,
    /// One statement per line.
    pub lines: Vec<String>,
    /// Whether the child is a standard chip.
    pub standard: bool,
}

/// Everything the chip template needs for one custom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipContext {
    /// Whether to emit a comment above each block.
    pub debug: bool,
    /// Type name.
    pub chip_type: String,
    /// Class name.
    pub chip_name: String,
    /// Input parameters, one per named input port.
    pub inputs: Vec<String>,
    /// Returned outputs, one per named output port.
    pub outputs: Vec<String>,
    /// Constructor parameters, one per declared constant, in name order.
    pub constants: Vec<String>,
    /// Every variable to declare in the run method.
    pub locals: Vec<String>,
    /// Constants of children, bound to literals.
    pub constant_vars: Vec<ConstantVar>,
    /// Custom children to construct.
    pub custom_chips: Vec<CustomChip>,
    /// Statement blocks in emission order.
    pub blocks: Vec<CodeBlock>,
}

/// Result of emitting one type.
#[derive(Debug, Clone)]
pub struct EmittedType {
    /// Input for the chip template.
    pub context: ChipContext,
    /// Custom types used by wired children.
    pub custom_chips_needed: BTreeSet<TypeName>,
}

/// Statement copying the value along one wire.
pub fn wire_statement(con: &Connection) -> String {
    format!("{} = {};", pin_var(&con.target), pin_var(&con.source))
}

struct Emitter<'a> {
    owner: &'a TypeName,
    content: &'a ChipContent,
    types: &'a BTreeMap<TypeName, ChipTypeData>,
    templates: &'a Templates,
    ctx: ChipContext,
    declared: BTreeSet<String>,
    needed: BTreeSet<TypeName>,
}

impl<'a> Emitter<'a> {
    fn declare(&mut self, var: String) {
        if self.declared.insert(var.clone()) {
            self.ctx.locals.push(var);
        }
    }

    /// A wire is emitted only if both ends exist.
    fn resolves(&self, con: &Connection) -> bool {
        [&con.source, &con.target]
            .into_iter()
            .all(|pin| pin.chip.is_boundary_of(self.owner) || self.content.chips.contains_key(&pin.chip))
    }

    fn wires_from(&self, chip: &ChipId) -> Vec<String> {
        outputs_of(self.content, chip)
            .filter(|c| self.resolves(c))
            .map(wire_statement)
            .collect()
    }

    fn preamble(&mut self) {
        let lines: Vec<String> = self
            .content
            .connections
            .iter()
            .filter(|c| !c.source.output && c.source.chip.is_boundary_of(self.owner) && self.resolves(c))
            .map(wire_statement)
            .collect();
        if lines.is_empty() {
            return;
        }
        self.ctx.blocks.push(CodeBlock {
            chip_type: self.owner.to_string(),
            id: self.owner.to_string(),
            description: "Setting Input Vars".into(),
            lines,
            standard: false,
        });
    }

    fn bind_constants(&mut self, chip: &Chip, data: &ChipTypeData) -> Vec<String> {
        let mut names = Vec::with_capacity(data.constants.len());
        for (key, value) in chip.resolved_constants(self.types) {
            let name = constant_var(chip.id.as_str(), &key);
            self.ctx.constant_vars.push(ConstantVar {
                name: name.clone(),
                value: value.to_literal(),
            });
            names.push(name);
        }
        names
    }

    fn standard(&mut self, chip: &Chip, data: &ChipTypeData, code: &str) -> Result<CodeBlock, CompileError> {
        let id = chip.id.as_str();
        let mut vars = BTreeMap::new();
        vars.insert("chipName".to_string(), self.owner.to_string());
        for port in data.named_ports(false) {
            vars.insert(format!("input_{port}"), input_var(id, port));
        }
        for port in data.named_ports(true) {
            vars.insert(format!("output_{port}"), output_var(id, port));
        }
        for (key, value) in chip.resolved_constants(self.types) {
            vars.insert(format!("constant_{key}"), constant_var(id, &key));
            vars.insert(format!("raw_constant_{key}"), value.to_string());
        }
        self.bind_constants(chip, data);

        let rendered = self.templates.render_code(chip.type_name.as_str(), code, &vars)?;
        let mut lines: Vec<String> = rendered
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .map(String::from)
            .collect();
        lines.extend(self.wires_from(&chip.id));

        Ok(CodeBlock {
            chip_type: chip.type_name.to_string(),
            id: id.to_string(),
            description: "Chip Code".into(),
            lines,
            standard: true,
        })
    }

    fn custom(&mut self, chip: &Chip, data: &ChipTypeData) -> CodeBlock {
        let id = chip.id.as_str();
        let object = chip_object(&chip.id);
        let constants = self.bind_constants(chip, data);
        self.ctx.custom_chips.push(CustomChip {
            id: id.to_string(),
            var: object.clone(),
            class: type_class(&chip.type_name),
            chip_type: chip.type_name.to_string(),
            constants,
        });
        self.needed.insert(chip.type_name.clone());

        let args: Vec<String> = data.named_ports(false).map(|p| input_var(id, p)).collect();
        let outs: Vec<String> = data.named_ports(true).map(|p| output_var(id, p)).collect();
        let call = format!("this.{object}.run({})", args.join(", "));

        let mut lines = Vec::with_capacity(outs.len() + 1);
        if outs.is_empty() {
            lines.push(format!("{call};"));
        } else {
            let temps: Vec<String> = outs.iter().map(|o| format!("_{o}")).collect();
            lines.push(format!("const [{}] = {call};", temps.join(", ")));
            for (out, temp) in outs.iter().zip(&temps) {
                lines.push(format!("{out} = {temp};"));
            }
        }
        lines.extend(self.wires_from(&chip.id));

        CodeBlock {
            chip_type: chip.type_name.to_string(),
            id: id.to_string(),
            description: "Chip Code".into(),
            lines,
            standard: false,
        }
    }
}

fn sorted(names: &[String]) -> impl Iterator<Item = &String> {
    names.iter().collect::<BTreeSet<_>>().into_iter()
}

/// Emits the children of `owner` in the order `plan` gives.
pub fn emit_type(
    owner: &TypeName,
    data: &ChipTypeData,
    types: &BTreeMap<TypeName, ChipTypeData>,
    plan: &ChipOrder,
    templates: &Templates,
    settings: &CompileSettings,
) -> Result<EmittedType, CompileError> {
    let me = owner.as_str();
    let mut emitter = Emitter {
        owner,
        content: &data.content,
        types,
        templates,
        ctx: ChipContext {
            debug: settings.debug,
            chip_type: me.to_string(),
            chip_name: type_class(owner),
            inputs: data.named_ports(false).map(|p| input_var(me, p)).collect(),
            outputs: data.named_ports(true).map(|p| output_var(me, p)).collect(),
            constants: sorted(&data.constants).map(|c| constant_var(me, c)).collect(),
            locals: Vec::new(),
            constant_vars: Vec::new(),
            custom_chips: Vec::new(),
            blocks: Vec::new(),
        },
        declared: BTreeSet::new(),
        needed: BTreeSet::new(),
    };
    emitter.declared.extend(emitter.ctx.inputs.iter().cloned());

    for id in &plan.order {
        let chip = data
            .content
            .chip(id)
            .ok_or_else(|| InternalError::new(format!("ordered chip `{id}` is not in `{owner}`")))?;
        let child = types.type_data(&chip.type_name);
        for port in child.named_ports(false) {
            emitter.declare(input_var(id.as_str(), port));
        }
        for port in child.named_ports(true) {
            emitter.declare(output_var(id.as_str(), port));
        }
    }
    for out in data.named_ports(true) {
        emitter.declare(output_var(me, out));
    }

    emitter.preamble();
    for id in &plan.order {
        let Some(chip) = data.content.chip(id) else {
            continue;
        };
        let Some(child) = types.get(&chip.type_name) else {
            return Err(CompileError::UnknownType {
                chip_type: chip.type_name.clone(),
                owner: owner.clone(),
                chip: chip.id.clone(),
            });
        };
        let block = match child.inline_code() {
            Some(code) => emitter.standard(chip, child, code)?,
            None => emitter.custom(chip, child),
        };
        emitter.ctx.blocks.push(block);
    }

    Ok(EmittedType {
        context: emitter.ctx,
        custom_chips_needed: emitter.needed,
    })
}
