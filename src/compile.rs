//! Whole-script compilation: lex, parse, then render.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::{
    codegen::{Backend, CodegenError},
    lexer::{self, LexError},
    parser::{self, ParseError},
    snippet::{MemorySnippets, SnippetProvider},
};

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lex,
    Parse,
    Codegen,
}

/// A positioned compile problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl From<LexError> for Diagnostic {
    fn from(e: LexError) -> Self {
        Diagnostic {
            stage: Stage::Lex,
            message: e.kind.to_string(),
            line: e.line,
            column: e.column,
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(e: ParseError) -> Self {
        Diagnostic {
            stage: Stage::Parse,
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

impl From<CodegenError> for Diagnostic {
    fn from(e: CodegenError) -> Self {
        let (line, column) = e.position();
        // Position travels in the diagnostic, not the message.
        let message = match e {
            CodegenError::Snippet { source, .. } => source.to_string(),
            CodegenError::UnknownJoinType { kind, .. } => format!("unknown join type {}", kind),
            CodegenError::UnresolvedIdentifier { name, .. } => {
                format!("'{}' is used before it is assigned", name)
            }
            CodegenError::DuplicateJoinName { name, .. } => {
                format!("'{}' names both sides of a join", name)
            }
        };
        Diagnostic {
            stage: Stage::Codegen,
            message,
            line,
            column,
        }
    }
}

/// Compiles `source` with the bundled snippets.
pub fn compile(source: &str) -> Result<String, Vec<Diagnostic>> {
    compile_with(source, &MemorySnippets::builtin())
}

/// Compiles `source` with the given snippet provider.
///
/// A lex error stops immediately. Parse errors are all collected, and any of
/// them prevents code generation.
pub fn compile_with(
    source: &str,
    snippets: &dyn SnippetProvider,
) -> Result<String, Vec<Diagnostic>> {
    let tokens = lexer::tokenize(source).map_err(|e| vec![Diagnostic::from(e)])?;
    debug!(tokens = tokens.len(), "scanned source");

    let (script, errors) = parser::parse(tokens);
    if !errors.is_empty() {
        return Err(errors.into_iter().map(Diagnostic::from).collect());
    }

    Backend::new(snippets)
        .render(&script)
        .map_err(|e| vec![Diagnostic::from(e)])
}
