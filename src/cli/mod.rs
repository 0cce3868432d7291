//! CLI support for sift
//!
//! Provides programmatic access to the sift commands so they can be embedded
//! in other tools and tested without spawning a process.

mod check;
mod compile;
mod docs;
mod repl;

pub use check::{CheckResult, execute_check, format_tokens};
pub use compile::{CompileOptions, CompileResult, execute_compile};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use repl::{Repl, run_repl};

use std::io;

use thiserror::Error;

use crate::{Diagnostic, config::ConfigError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Lex, parse or codegen diagnostics
    #[error("{}", format_diagnostics(.0))]
    Compile(Vec<Diagnostic>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass a script path or pipe a script to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'sift docs' to see available categories.")]
    UnknownCategory(String),
}

/// How diagnostics are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiagnosticFormat {
    #[default]
    Text,
    Json,
}

/// One diagnostic per line, `line:column: message`.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("error: {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Diagnostics in the requested format.
pub fn render_diagnostics(
    diagnostics: &[Diagnostic],
    format: DiagnosticFormat,
) -> Result<String, CliError> {
    match format {
        DiagnosticFormat::Text => Ok(format_diagnostics(diagnostics)),
        DiagnosticFormat::Json => Ok(serde_json::to_string_pretty(diagnostics)?),
    }
}
