//! Commands that manage type definitions: `types`, `new`, `resize`, `port`,
//! and `const`.

use chipgrid_common::Vec2;

use crate::session::{status, usage, CliError, Session};
use crate::{ConstAction, GlobalArgs, PortSide};

/// Lists every type, standard ones first.
pub fn run(global: &GlobalArgs) -> Result<i32, CliError> {
    let session = Session::open(global)?;
    let registry = &session.registry;

    println!("standard:");
    for name in registry.standard_type_list() {
        let data = registry.get_data(&name);
        println!("  {:<10} {}x{}  {}", name, data.size.x, data.size.y, data.description);
    }
    println!("custom:");
    for name in registry.custom_types().keys() {
        let data = registry.get_data(name);
        let marker = if name == registry.base_type() { " (base)" } else { "" };
        println!(
            "  {:<10} {}x{}  {} chip(s), {} wire(s){marker}",
            name,
            data.size.x,
            data.size.y,
            data.content.chips.len(),
            data.content.connections.len()
        );
    }
    Ok(0)
}

/// Registers a custom type.
pub fn new_type(name: &str, global: &GlobalArgs) -> Result<i32, CliError> {
    let mut session = Session::open(global)?;
    match session.registry.new_type(name)? {
        Some(name) => {
            status(global, "Created", format!("chip type `{name}`"));
            Ok(0)
        }
        None => Err(usage(format!("`{}` is a standard chip type", name.to_lowercase()))),
    }
}

/// Resizes a custom type and prints the size it got.
pub fn resize(name: &str, x: i32, y: i32, global: &GlobalArgs) -> Result<i32, CliError> {
    let mut session = Session::open(global)?;
    let name = session.custom_type(name)?;
    let requested = Vec2::new(x, y);
    let size = session.registry.set_size(&name, requested)?;
    if size != requested {
        status(global, "Clamped", format!("{requested} to {size}"));
    }
    status(global, "Resized", format!("`{name}` to {size}"));
    println!("{} {}", size.x, size.y);
    Ok(0)
}

/// Renames a port.
pub fn port(name: &str, side: PortSide, index: usize, port: &str, global: &GlobalArgs) -> Result<i32, CliError> {
    let mut session = Session::open(global)?;
    let name = session.custom_type(name)?;
    let applied = match side {
        PortSide::Input => session.registry.set_input(&name, index, port)?,
        PortSide::Output => session.registry.set_output(&name, index, port)?,
    };
    if !applied {
        let side = match side {
            PortSide::Input => "input",
            PortSide::Output => "output",
        };
        return Err(usage(format!(
            "cannot name {side} {index} of `{name}` `{}`: out of range or already used",
            port.trim().to_uppercase()
        )));
    }
    status(global, "Renamed", format!("port {index} of `{name}`"));
    Ok(0)
}

/// Adds or removes a constant slot.
pub fn constant(name: &str, action: ConstAction, constant: &str, global: &GlobalArgs) -> Result<i32, CliError> {
    let mut session = Session::open(global)?;
    let name = session.custom_type(name)?;
    let constant = constant.trim().to_uppercase();
    match action {
        ConstAction::Add => {
            session.registry.add_const(&name, &constant)?;
            status(global, "Added", format!("constant {constant} to `{name}`"));
        }
        ConstAction::Remove => {
            session.registry.remove_const(&name, &constant)?;
            status(global, "Removed", format!("constant {constant} from `{name}`"));
        }
    }
    Ok(0)
}
