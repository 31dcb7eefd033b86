//! `chipgrid compile`: turn a chip into program text.

use std::fs;
use std::path::PathBuf;

use chipgrid_compile::Compiler;
use chipgrid_diagnostics::DiagnosticSink;
use chipgrid_ir::ChipSource;

use crate::session::{report, resolve_root, status, usage, CliError, Session};
use crate::{CompileArgs, GlobalArgs};

/// Compiles a source document or a stored type.
///
/// Warnings are printed but do not fail the command.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let (source, config, root) = match (&args.source, &args.chip_type) {
        (Some(path), _) => {
            let path = PathBuf::from(path);
            let text = fs::read_to_string(&path).map_err(|source| CliError::Io {
                action: "read",
                path: path.clone(),
                source,
            })?;
            let root = resolve_root(global)?;
            let config = chipgrid_config::load_config_or_default(&root)?;
            (ChipSource::from_json(&text).map_err(chipgrid_compile::CompileError::from)?, config, root)
        }
        (None, Some(name)) => {
            let session = Session::open(global)?;
            let name = session.custom_type(name)?;
            let source = session.registry.to_source(&name);
            (source, session.config, session.root)
        }
        (None, None) => return Err(usage("give a chip source file or --type")),
    };

    let mut config = config;
    config.compile.debug |= args.debug;
    let compiler = Compiler::from_config(&config, &root)?;

    status(global, "Compiling", format!("`{}`", source.chip.type_name));
    let sink = DiagnosticSink::new();
    let program = compiler.compile(&source, &sink);
    report(global, &sink.take_all());
    let program = program?;

    if global.verbose {
        let order: Vec<&str> = program.order.iter().map(|t| t.as_str()).collect();
        eprintln!("   Built {}", order.join(", "));
    }

    match &args.output {
        Some(out) => {
            let path = PathBuf::from(out);
            fs::write(&path, &program.code).map_err(|source| CliError::Io {
                action: "write",
                path: path.clone(),
                source,
            })?;
            status(global, "Wrote", path.display());
        }
        None => println!("{}", program.code),
    }
    Ok(0)
}
