//! The compile driver: checks, orders, emits, and assembles.

use crate::codes::{warning_dead_chip, warning_feedback_loop};
use crate::deps::TypeGraph;
use crate::emit::emit_type;
use crate::error::CompileError;
use crate::ident::type_class;
use crate::order::order_chips;
use crate::templates::{ProgramContext, Templates};
use chipgrid_common::{ChipResult, InternalError};
use chipgrid_config::{ChipgridConfig, CompileConfig};
use chipgrid_diagnostics::DiagnosticSink;
use chipgrid_ir::{standard_library, ChipId, ChipSource, ChipTypeData, ConstValue, TypeName};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Knobs for ordering and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileSettings {
    /// Rounds of score propagation when ordering chips.
    pub relaxation_rounds: u32,
    /// Initial score of a chip fed by another chip.
    pub seed_score: u64,
    /// Emit comments naming each block.
    pub debug: bool,
}

impl CompileSettings {
    /// Settings from the `[compile]` section.
    pub fn from_config(config: &CompileConfig) -> Self {
        Self {
            relaxation_rounds: config.relaxation_rounds,
            seed_score: config.seed_score,
            debug: config.debug,
        }
    }
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self::from_config(&CompileConfig::default())
    }
}

/// One compiled custom type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledType {
    /// The rendered class.
    pub code: String,
    /// Custom types its wired children use.
    pub custom_chips_needed: BTreeSet<TypeName>,
    /// Wired children in emission order.
    pub chip_order: Vec<ChipId>,
}

/// The result of compiling one root chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    /// Complete program text. Evaluating it yields an instance of the root type.
    pub code: String,
    /// The root chip's type.
    pub root: TypeName,
    /// Every compiled type, dependencies first, the root last.
    pub order: Vec<TypeName>,
    /// The root plus every custom type a compiled type needs.
    pub needed: BTreeSet<TypeName>,
    /// Compiled types by name.
    pub types: BTreeMap<TypeName, CompiledType>,
}

/// Compiles chip sources into program text.
#[derive(Debug)]
pub struct Compiler {
    settings: CompileSettings,
    templates: Templates,
    library: BTreeMap<TypeName, ChipTypeData>,
}

impl Compiler {
    /// A compiler with the given settings and templates.
    pub fn new(settings: CompileSettings, templates: Templates) -> ChipResult<Self> {
        Ok(Self {
            settings,
            templates,
            library: standard_library()?,
        })
    }

    /// A compiler configured by `config`. Template overrides are looked up
    /// relative to `root`.
    pub fn from_config(config: &ChipgridConfig, root: &Path) -> Result<Self, CompileError> {
        let templates = match &config.compile.templates {
            Some(dir) => Templates::load(&root.join(dir))?,
            None => Templates::builtin(),
        };
        Ok(Self::new(CompileSettings::from_config(&config.compile), templates)?)
    }

    /// The active settings.
    pub fn settings(&self) -> &CompileSettings {
        &self.settings
    }

    /// The source's types with the standard library laid over them.
    fn resolve_types(&self, source: &ChipSource) -> BTreeMap<TypeName, ChipTypeData> {
        let mut types: BTreeMap<TypeName, ChipTypeData> = source
            .chip_data
            .iter()
            .map(|(name, data)| (name.clone(), data.clone().sanitized()))
            .collect();
        for (name, data) in &self.library {
            types.insert(name.clone(), data.clone());
        }
        types
    }

    /// Parses a chip source document and compiles it.
    pub fn compile_json(&self, text: &str, sink: &DiagnosticSink) -> Result<CompiledProgram, CompileError> {
        let source = ChipSource::from_json(text)?;
        self.compile(&source, sink)
    }

    /// Compiles the root chip of `source`.
    ///
    /// Children without wires and loops between children are reported to
    /// `sink` as warnings. Everything that prevents a correct program is
    /// returned as an error instead.
    pub fn compile(&self, source: &ChipSource, sink: &DiagnosticSink) -> Result<CompiledProgram, CompileError> {
        let types = self.resolve_types(source);
        let root = source.chip.type_name.clone();
        match types.get(&root) {
            None => {
                return Err(CompileError::RootNotCompilable {
                    root,
                    reason: "the type is not defined in the source",
                })
            }
            Some(data) if !data.is_composite() => {
                return Err(CompileError::RootNotCompilable {
                    root,
                    reason: "standard chips have no content to compile",
                })
            }
            Some(_) => {}
        }

        let order = TypeGraph::build(&root, &types)?.build_order()?;

        let mut needed = BTreeSet::from([root.clone()]);
        let mut compiled = BTreeMap::new();
        let mut blocks = Vec::with_capacity(order.len());
        for name in &order {
            let data = types
                .get(name)
                .ok_or_else(|| InternalError::new(format!("type `{name}` vanished during compilation")))?;

            let plan = order_chips(name, &data.content, &self.settings);
            sink.extend(plan.dead.iter().map(|chip| warning_dead_chip(name, chip)));
            sink.extend(plan.loops.iter().map(|chips| warning_feedback_loop(name, chips)));

            let emitted = emit_type(name, data, &types, &plan, &self.templates, &self.settings)?;
            let code = self.templates.render_chip(&emitted.context)?;
            needed.extend(emitted.custom_chips_needed.iter().cloned());
            blocks.push(code.clone());
            compiled.insert(
                name.clone(),
                CompiledType {
                    code,
                    custom_chips_needed: emitted.custom_chips_needed,
                    chip_order: plan.order,
                },
            );
        }

        let constants = source
            .chip
            .resolved_constants(&types)
            .values()
            .map(ConstValue::to_literal)
            .collect();
        let code = self.templates.render_program(&ProgramContext {
            chip_type: root.to_string(),
            chip_name: type_class(&root),
            constants,
            blocks,
            debug: self.settings.debug,
        })?;

        Ok(CompiledProgram {
            code,
            root,
            order,
            needed,
            types: compiled,
        })
    }
}
