//! Line-oriented interactive compiler

use std::io::{self, BufRead, Write};

use crate::{Diagnostic, compile_with, snippet::SnippetProvider};

const PROMPT: &str = "sift> ";
const CONTINUATION: &str = "...> ";

/// Accumulates accepted statements and recompiles them on each entry.
pub struct Repl<'s> {
    snippets: &'s dyn SnippetProvider,
    accepted: String,
    pending: String,
}

impl<'s> Repl<'s> {
    pub fn new(snippets: &'s dyn SnippetProvider) -> Self {
        Repl {
            snippets,
            accepted: String::new(),
            pending: String::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.trim().is_empty()
    }

    pub fn reset(&mut self) {
        self.accepted.clear();
        self.pending.clear();
    }

    /// Adds a line of input.
    ///
    /// Returns `None` while the entry is incomplete (no trailing `;`). A
    /// complete entry is compiled together with everything accepted before;
    /// it is kept on success and dropped on failure.
    pub fn feed(&mut self, line: &str) -> Option<Result<String, Vec<Diagnostic>>> {
        self.pending.push_str(line);
        self.pending.push('\n');

        if !self.pending.trim_end().ends_with(';') {
            return None;
        }

        let entry = std::mem::take(&mut self.pending);
        let candidate = format!("{}{}", self.accepted, entry);
        let result = compile_with(&candidate, self.snippets);
        if result.is_ok() {
            self.accepted = candidate;
        }
        Some(result)
    }
}

/// Runs the REPL until end of input or `:quit`.
pub fn run_repl(
    input: impl BufRead,
    mut output: impl Write,
    snippets: &dyn SnippetProvider,
) -> io::Result<()> {
    let mut repl = Repl::new(snippets);
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match line.trim() {
            ":quit" | ":q" => break,
            ":reset" => {
                repl.reset();
                writeln!(output, "cleared")?;
            }
            _ => match repl.feed(&line) {
                None => {}
                Some(Ok(compiled)) => writeln!(output, "{}", compiled)?,
                Some(Err(diagnostics)) => {
                    for d in diagnostics {
                        writeln!(output, "error: {}", d)?;
                    }
                }
            },
        }

        let prompt = if repl.is_pending() { CONTINUATION } else { PROMPT };
        write!(output, "{}", prompt)?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(())
}
