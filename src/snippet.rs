//! Named target-language templates with placeholder substitution.
//!
//! A snippet is plain text with placeholders written as `/*%key%*/` or
//! `__key__`. The comment form keeps a template valid target code before
//! substitution; the underscore form fits in identifier position.
//!
//! ```
//! use sift_lang::snippet::substitute;
//!
//! let text = substitute("star", "const __name__ = /*%value%*/;", &[("name", "x"), ("value", "1")]).unwrap();
//! assert_eq!(text, "const x = 1;");
//! ```

mod builtin;

use std::{
    borrow::Cow,
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::{Captures, Regex};
use thiserror::Error;

pub use builtin::REQUIRED_SNIPPETS;

/// Placeholder key, shared by both forms: letters and digits, optionally
/// split by single underscores, so `__c_d__` ends where `/*%c_d%*/` does.
const KEY: &str = "[A-Za-z](?:_?[A-Za-z0-9])*";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"/\*%({KEY})%\*/|__({KEY})__")).expect("placeholder pattern is valid")
});

#[derive(Debug, Error)]
pub enum SnippetError {
    /// A substitution was supplied for a key the template never mentions
    #[error("snippet '{snippet}' has no placeholder '{placeholder}'")]
    MissingPlaceholder {
        snippet: String,
        placeholder: String,
    },

    #[error("unknown snippet '{0}'")]
    UnknownSnippet(String),

    #[error("failed to read snippet {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of named templates.
pub trait SnippetProvider {
    /// Raw template text for `name`.
    fn template(&self, name: &str) -> Result<Cow<'_, str>, SnippetError>;

    /// Template `name` with every placeholder in `substitutions` filled in.
    fn get(&self, name: &str, substitutions: &[(&str, &str)]) -> Result<String, SnippetError> {
        let template = self.template(name)?;
        substitute(name, &template, substitutions)
    }
}

/// Placeholder keys in `template`, in order of first occurrence.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let key = placeholder_key(&caps);
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

fn placeholder_key<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str())
}

/// Fills placeholders of `template` in a single pass.
///
/// Both placeholder forms are replaced for every supplied key. Inserted
/// values are not scanned again, and placeholders without a supplied value
/// are left as they are. A supplied key that the template does not contain
/// is an error.
pub fn substitute(
    snippet: &str,
    template: &str,
    substitutions: &[(&str, &str)],
) -> Result<String, SnippetError> {
    let present = placeholders(template);
    if let Some((key, _)) = substitutions
        .iter()
        .find(|(key, _)| !present.iter().any(|p| p == key))
    {
        return Err(SnippetError::MissingPlaceholder {
            snippet: snippet.to_string(),
            placeholder: key.to_string(),
        });
    }

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let key = placeholder_key(caps);
        match substitutions.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => value.to_string(),
            None => caps[0].to_string(),
        }
    });
    Ok(rendered.into_owned())
}

/// Templates held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySnippets {
    snippets: HashMap<String, String>,
}

impl MemorySnippets {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled TypeScript snippet set.
    pub fn builtin() -> Self {
        let mut snippets = Self::new();
        for (name, text) in builtin::SNIPPETS {
            snippets.insert(*name, *text);
        }
        snippets
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.snippets.insert(name.into(), text.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }
}

impl SnippetProvider for MemorySnippets {
    fn template(&self, name: &str) -> Result<Cow<'_, str>, SnippetError> {
        self.snippets
            .get(name)
            .map(|s| Cow::Borrowed(s.as_str()))
            .ok_or_else(|| SnippetError::UnknownSnippet(name.to_string()))
    }
}

/// Templates read from `<dir>/<name>.<extension>` on demand.
#[derive(Debug, Clone)]
pub struct FileSnippets {
    dir: PathBuf,
    extension: String,
}

impl FileSnippets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSnippets {
            dir: dir.into(),
            extension: "ts".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, self.extension))
    }

    /// Required snippet names with no file in the directory.
    pub fn missing(&self) -> Vec<&'static str> {
        REQUIRED_SNIPPETS
            .iter()
            .copied()
            .filter(|name| !self.path_for(name).is_file())
            .collect()
    }
}

impl SnippetProvider for FileSnippets {
    fn template(&self, name: &str) -> Result<Cow<'_, str>, SnippetError> {
        let path = self.path_for(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Cow::Owned(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SnippetError::UnknownSnippet(name.to_string()))
            }
            Err(source) => Err(SnippetError::Io { path, source }),
        }
    }
}
