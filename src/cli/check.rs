//! Syntax-only validation and token dumps

use super::CliError;
use crate::{Diagnostic, Token, TokenKind, ast::Literal, lexer, parser};

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Number of statements in the script
    pub statements: usize,
}

/// Lex and parse `script`, reporting every parse error.
pub fn execute_check(script: &str) -> Result<CheckResult, CliError> {
    let tokens = lexer::tokenize(script).map_err(|e| CliError::Compile(vec![e.into()]))?;
    let (parsed, errors) = parser::parse(tokens);

    if !errors.is_empty() {
        let diagnostics: Vec<Diagnostic> = errors.into_iter().map(Diagnostic::from).collect();
        return Err(CliError::Compile(diagnostics));
    }

    Ok(CheckResult {
        statements: parsed.statements.len(),
    })
}

/// One line per token: position, kind and literal value.
pub fn format_tokens(script: &str) -> Result<String, CliError> {
    let tokens = lexer::tokenize(script).map_err(|e| CliError::Compile(vec![e.into()]))?;
    Ok(tokens.iter().map(format_token).collect::<Vec<_>>().join("\n"))
}

fn format_token(token: &Token) -> String {
    let position = token.position();
    let value = match &token.value {
        Some(Literal::String(s)) if token.kind == TokenKind::String => format!("\"{}\"", s),
        Some(Literal::String(s)) => s.clone(),
        Some(Literal::Decimal(d)) => d.to_string(),
        Some(Literal::Boolean(b)) => b.to_string(),
        None => String::new(),
    };
    format!("{:<8} {:<12} {}", position, format!("{:?}", token.kind), value)
        .trim_end()
        .to_string()
}
