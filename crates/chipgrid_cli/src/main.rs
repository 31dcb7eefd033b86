//! chipgrid: the command-line front end for chip type design.
//!
//! Every command works on a design directory holding an optional
//! `chipgrid.toml` and a store of custom chip types. `types`, `new`, `resize`,
//! `port`, and `const` manage type definitions; `place`, `wire`, and
//! `reroute` edit a type's content; `check` reports problems in a content
//! graph; `compile` turns a chip into program text.

#![warn(missing_docs)]

mod catalog;
mod check;
mod compile;
mod edit;
mod session;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::session::report;

/// chipgrid: design, wire, and compile logic chips.
#[derive(Parser, Debug)]
#[command(name = "chipgrid", version, about = "Chip grid designer and compiler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `chipgrid.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Directory of the type store, overriding `[storage] dir`.
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Output format for diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List standard and custom chip types.
    Types,
    /// Register a new custom chip type.
    New {
        /// Name of the type.
        name: String,
    },
    /// Resize a custom type.
    Resize {
        /// Type to resize.
        name: String,
        /// Width in type units.
        x: i32,
        /// Height in type units.
        y: i32,
    },
    /// Rename an input or output port of a custom type.
    Port {
        /// Type to change.
        name: String,
        /// Which side of the chip.
        #[arg(value_enum)]
        side: PortSide,
        /// Port position.
        index: usize,
        /// New port name, empty to clear the position.
        port: String,
    },
    /// Add or remove a constant slot of a custom type.
    Const {
        /// Type to change.
        name: String,
        /// What to do.
        #[arg(value_enum)]
        action: ConstAction,
        /// Constant name.
        constant: String,
    },
    /// Place a chip instance in a custom type's content.
    Place(PlaceArgs),
    /// Connect two pins in a custom type's content.
    Wire(WireArgs),
    /// Re-route every wire without a hand-drawn path.
    Reroute {
        /// Type whose wires to route.
        name: String,
    },
    /// Report problems in a custom type's content.
    Check {
        /// Type to check.
        name: String,
    },
    /// Compile a chip to program text.
    Compile(CompileArgs),
}

/// Arguments for `chipgrid place`.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// Type whose content receives the chip.
    pub owner: String,
    /// Type of the new chip.
    pub chip_type: String,
    /// Id of the new chip, unique within the content.
    pub id: String,
    /// Grid column.
    pub x: i32,
    /// Grid row.
    pub y: i32,
    /// Quarter turns clockwise.
    #[arg(long, default_value_t = 0)]
    pub rotation: i32,
    /// Constant values, as `NAME=value`.
    #[arg(long = "const", value_name = "NAME=VALUE")]
    pub constants: Vec<String>,
}

/// Arguments for `chipgrid wire`.
#[derive(Parser, Debug)]
pub struct WireArgs {
    /// Type whose content receives the wire.
    pub owner: String,
    /// First pin, `<chip>.<in|out>.<PIN>`.
    pub from: String,
    /// Second pin, `<chip>.<in|out>.<PIN>`.
    pub to: String,
    /// Drawing layer.
    #[arg(long, default_value_t = 0)]
    pub layer: i32,
}

/// Arguments for `chipgrid compile`.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// A chip source JSON document.
    #[arg(required_unless_present = "chip_type", conflicts_with = "chip_type")]
    pub source: Option<String>,
    /// Compile a custom type from the store instead of a source file.
    #[arg(long = "type")]
    pub chip_type: Option<String>,
    /// Write the program here instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
    /// Emit a comment above every block.
    #[arg(long)]
    pub debug: bool,
}

/// Port side for `chipgrid port`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PortSide {
    /// An input port.
    Input,
    /// An output port.
    Output,
}

/// Action for `chipgrid const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConstAction {
    /// Add the slot.
    Add,
    /// Remove the slot.
    Remove,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the environment.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Global settings derived from CLI flags.
#[derive(Debug)]
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print extra progress information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to the configuration file or its directory.
    pub config: Option<String>,
    /// Optional type store directory.
    pub store: Option<String>,
    /// How to print diagnostics.
    pub format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
        store: cli.store,
        format: cli.format,
    };

    let result = match cli.command {
        Command::Types => catalog::run(&global),
        Command::New { ref name } => catalog::new_type(name, &global),
        Command::Resize { ref name, x, y } => catalog::resize(name, x, y, &global),
        Command::Port {
            ref name,
            side,
            index,
            ref port,
        } => catalog::port(name, side, index, port, &global),
        Command::Const {
            ref name,
            action,
            ref constant,
        } => catalog::constant(name, action, constant, &global),
        Command::Place(ref args) => edit::place(args, &global),
        Command::Wire(ref args) => edit::wire(args, &global),
        Command::Reroute { ref name } => edit::reroute(name, &global),
        Command::Check { ref name } => check::run(name, &global),
        Command::Compile(ref args) => compile::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            match e.to_diagnostic() {
                Some(diag) => report(&global, &[diag]),
                None => eprintln!("error: {e}"),
            }
            process::exit(e.exit_code());
        }
    }
}
