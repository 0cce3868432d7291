use crate::ast::{FieldSpec, Identifier, StringLiteral, Token, TsExpression};

/// Records read from a delimited or JSON file.
///
/// # Example
/// ```text
/// EXTRACT name, age FROM "people.csv"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FileSource {
    pub token: Token,
    pub field_spec: FieldSpec,
    pub file_name: StringLiteral,
}

/// Row predicate of a select.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereStatement {
    pub token: Token,
    pub condition: TsExpression,
}

/// Projection of another source, with an optional row predicate.
///
/// # Example
/// ```text
/// SELECT name FROM people WHERE {{ age > 18 }}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub token: Token,
    pub field_spec: FieldSpec,
    pub source: Box<Source>,
    pub where_clause: Option<WhereStatement>,
}

/// Source renamed for use in join conditions and qualified fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasedSource {
    pub token: Token,
    pub source: Box<Source>,
    pub alias: Identifier,
}

/// Join of two sources.
///
/// The token is the join operator (`INNER`, `LEFT`, `RIGHT` or `OUTER`).
/// Chained joins nest on the left:
///
/// ```text
/// a INNER JOIN b ON {{..}} LEFT JOIN c ON {{..}}
///   => Join(Left, Join(Inner, a, b), c)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JoinQuery {
    pub token: Token,
    pub left: Box<Source>,
    pub right: Box<Source>,
    pub condition: TsExpression,
}

/// Anything that yields a field schema followed by records.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    File(FileSource),
    /// Reference to a previously assigned name
    Identifier(Identifier),
    Select(SelectQuery),
    Aliased(AliasedSource),
    Join(JoinQuery),
}

impl Source {
    pub fn token(&self) -> &Token {
        match self {
            Source::File(s) => &s.token,
            Source::Identifier(s) => &s.token,
            Source::Select(s) => &s.token,
            Source::Aliased(s) => &s.token,
            Source::Join(s) => &s.token,
        }
    }
}
