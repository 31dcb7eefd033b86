//! Commands that edit a type's content: `place`, `wire`, and `reroute`.

use chipgrid_common::Vec2;
use chipgrid_edit::ContentEditor;
use chipgrid_ir::{Chip, ConstValue, Pin, TypeName};

use crate::session::{status, usage, CliError, Session};
use crate::{GlobalArgs, PlaceArgs, WireArgs};

fn parse_pin(text: &str) -> Result<Pin, CliError> {
    text.parse::<Pin>().map_err(|e| usage(e.to_string()))
}

/// Places a chip instance.
pub fn place(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let mut session = Session::open(global)?;
    let owner = session.custom_type(&args.owner)?;
    let chip_type = TypeName::new(&args.chip_type);
    if !session.registry.contains(&chip_type) {
        return Err(usage(format!("no chip type named `{chip_type}`")));
    }

    let registry = &session.registry;
    let mut chip = Chip::new(args.id.as_str(), chip_type, Vec2::new(args.x, args.y));
    chip.rotate(args.rotation);
    for assignment in &args.constants {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| usage(format!("constant `{assignment}` is not NAME=VALUE")))?;
        if !chip.set_constant(key.trim(), ConstValue::parse(value), registry) {
            return Err(usage(format!("`{}` has no constant `{}`", chip.type_name, key.trim())));
        }
    }

    let mut editor = ContentEditor::open(registry, &owner);
    if !editor.add_chip(chip, registry) {
        return Err(usage(format!(
            "cannot place `{}` in `{owner}`: the id is taken or reserved, or the chip is too large",
            args.id.to_lowercase()
        )));
    }
    if let Some(placed) = editor.chip(&args.id.as_str().into()) {
        status(global, "Placed", format!("`{}` at {}", placed.id, placed.pos));
    }
    editor.commit(&mut session.registry)?;
    Ok(0)
}

/// Connects two pins and reports whether a route was found.
pub fn wire(args: &WireArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let mut session = Session::open(global)?;
    let owner = session.custom_type(&args.owner)?;
    let (a, b) = (parse_pin(&args.from)?, parse_pin(&args.to)?);

    let registry = &session.registry;
    let mut editor = ContentEditor::open(registry, &owner);
    if !editor.connect(a.clone(), b.clone(), args.layer, registry) {
        return Err(usage(format!(
            "cannot connect {a} and {b}: unknown pin, pin already driven, or incompatible directions"
        )));
    }
    if let Some(con) = editor.content().connections.last() {
        let verb = if con.valid_path { "Wired" } else { "Unrouted" };
        status(global, verb, con.id());
    }
    editor.commit(&mut session.registry)?;
    Ok(0)
}

/// Routes every wire without a hand-drawn path again.
pub fn reroute(name: &str, global: &GlobalArgs) -> Result<i32, CliError> {
    let mut session = Session::open(global)?;
    let owner = session.custom_type(name)?;
    let registry = &session.registry;
    let mut editor = ContentEditor::open(registry, &owner);
    let routed = editor.update_connections_for_chip(None, registry);
    let invalid = editor.content().connections.iter().filter(|c| !c.valid_path).count();
    editor.commit(&mut session.registry)?;
    status(global, "Rerouted", format!("{routed} wire(s) in `{owner}`, {invalid} without a route"));
    Ok(0)
}
