//! Shared setup for every command: locating the design directory, loading
//! configuration, opening the type store, and reporting results.

use std::io;
use std::path::{Path, PathBuf};

use chipgrid_compile::CompileError;
use chipgrid_config::{ChipgridConfig, ConfigError};
use chipgrid_diagnostics::{Diagnostic, DiagnosticRenderer, JsonRenderer, TerminalRenderer};
use chipgrid_ir::TypeName;
use chipgrid_registry::{DirStore, RegistryError, TypeRegistry};

use crate::{GlobalArgs, ReportFormat};

/// Why a command failed.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The request makes no sense for the current design.
    #[error("{0}")]
    Usage(String),

    /// `chipgrid.toml` is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The type store failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A file given on the command line could not be read or written.
    #[error("failed to {action} {path}: {source}")]
    Io {
        /// `read` or `write`.
        action: &'static str,
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

impl CliError {
    /// Process exit code: 2 for bugs in chipgrid, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Registry(RegistryError::Internal(_)) | CliError::Compile(CompileError::Internal(_)) => 2,
            _ => 1,
        }
    }

    /// A diagnostic for errors that have one.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            CliError::Compile(e) => e.to_diagnostic(),
            _ => None,
        }
    }
}

/// Shorthand for a usage error.
pub fn usage(message: impl Into<String>) -> CliError {
    CliError::Usage(message.into())
}

/// Directory that holds `chipgrid.toml` and the type store.
///
/// `--config` may name the file itself or its directory. Without it the
/// current directory is used.
pub fn resolve_root(global: &GlobalArgs) -> Result<PathBuf, CliError> {
    match &global.config {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_file() {
                Ok(p.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(".")))
            } else {
                Ok(p)
            }
        }
        None => std::env::current_dir().map_err(|source| CliError::Io {
            action: "read",
            path: PathBuf::from("."),
            source,
        }),
    }
}

/// Configuration, registry, and where they came from.
#[derive(Debug)]
pub struct Session {
    /// The design directory.
    pub root: PathBuf,
    /// Effective configuration.
    pub config: ChipgridConfig,
    /// The type registry, backed by the store directory.
    pub registry: TypeRegistry,
}

impl Session {
    /// Loads the configuration (defaults if there is none) and opens the
    /// store named by `--store` or `[storage]`.
    pub fn open(global: &GlobalArgs) -> Result<Self, CliError> {
        let root = resolve_root(global)?;
        let config = chipgrid_config::load_config_or_default(&root)?;
        let store = match &global.store {
            Some(dir) => DirStore::new(dir, config.storage.prefix.clone()),
            None => DirStore::from_config(&root, &config.storage),
        };
        if global.verbose {
            eprintln!("   Opening type store {}", store.dir().display());
        }
        let registry = TypeRegistry::open(&config, Box::new(store))?;
        Ok(Self { root, config, registry })
    }

    /// Fails unless `name` is a registered custom type.
    pub fn custom_type(&self, name: &str) -> Result<TypeName, CliError> {
        let name = TypeName::new(name);
        if self.registry.is_custom(&name) {
            Ok(name)
        } else if self.registry.contains(&name) {
            Err(usage(format!("`{name}` is a standard chip and cannot be edited")))
        } else {
            Err(usage(format!("no custom chip type named `{name}`; create it with `chipgrid new {name}`")))
        }
    }
}

/// Prints a status line unless `--quiet` is set.
pub fn status(global: &GlobalArgs, verb: &str, object: impl std::fmt::Display) {
    if !global.quiet {
        eprintln!("   {verb} {object}");
    }
}

/// Renders diagnostics in the selected format.
///
/// Text goes to stderr, JSON lines to stdout.
pub fn report(global: &GlobalArgs, diagnostics: &[Diagnostic]) {
    match global.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            for diag in diagnostics {
                print!("{}", JsonRenderer.render(diag));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipgrid_common::InternalError;
    use std::fs;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: config.map(|p| p.to_string_lossy().into_owned()),
            store: None,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn root_from_config_file_or_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join(chipgrid_config::CONFIG_FILE);
        fs::write(&file, "").unwrap();
        assert_eq!(resolve_root(&global(Some(&file))).unwrap(), tmp.path());
        assert_eq!(resolve_root(&global(Some(tmp.path()))).unwrap(), tmp.path());
    }

    #[test]
    fn session_uses_configured_store() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(chipgrid_config::CONFIG_FILE),
            "[storage]\ndir = \"types\"\nprefix = \"X_\"\n",
        )
        .unwrap();
        let mut session = Session::open(&global(Some(tmp.path()))).unwrap();
        session.registry.new_type("adder").unwrap();
        assert!(tmp.path().join("types/X_adder.json").exists());
        assert!(session.custom_type("adder").is_ok());
        assert!(matches!(session.custom_type("and"), Err(CliError::Usage(_))));
        assert!(matches!(session.custom_type("nope"), Err(CliError::Usage(_))));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(chipgrid_config::CONFIG_FILE), "[editor]\nscale_factor = 0\n").unwrap();
        let err = Session::open(&global(Some(tmp.path()))).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::ValidationError(_))));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn internal_errors_exit_with_two() {
        let err = CliError::Compile(CompileError::Internal(InternalError::new("bug")));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(usage("nope").exit_code(), 1);
    }
}
