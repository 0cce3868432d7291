//! Compile scripts to files or stdout

use std::{fs, path::PathBuf};

use tracing::info;

use super::CliError;
use crate::{Config, compile_with};

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Script source text
    pub script: String,
    /// Path the script was read from, if any
    pub script_path: Option<PathBuf>,
    /// Explicit output file
    pub output: Option<PathBuf>,
    /// Template directory overriding the configuration
    pub snippets_dir: Option<PathBuf>,
}

/// Result of a compile operation
#[derive(Debug)]
pub enum CompileResult {
    /// Compiled text, to be printed
    Printed(String),
    /// Compiled text was written to this file
    Written(PathBuf),
}

/// Compile `options.script` using the snippets and output settings of `config`.
pub fn execute_compile(
    options: &CompileOptions,
    config: &Config,
) -> Result<CompileResult, CliError> {
    let overridden;
    let config = match &options.snippets_dir {
        Some(dir) => {
            overridden = config.with_snippets_dir(dir);
            &overridden
        }
        None => config,
    };
    let snippets = config.snippet_provider();

    let output = compile_with(&options.script, snippets.as_ref()).map_err(CliError::Compile)?;

    let target = options.output.clone().or_else(|| {
        options
            .script_path
            .as_deref()
            .and_then(|p| config.output_path(p))
    });

    match target {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, output)?;
            info!(path = %path.display(), "wrote compiled script");
            Ok(CompileResult::Written(path))
        }
        None => Ok(CompileResult::Printed(output)),
    }
}
