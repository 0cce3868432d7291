//! # Sift Script Language - Abstract Syntax Tree
//!
//! This module defines the tree the parser builds from a sift script and the
//! code generator walks to render the target pipeline.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[fields]** - Field specifications, literals and opaque expressions
//! - **[sources]** - Record sources (files, selects, joins, references)
//! - **[statements]** - Top-level statements (assignment, output, params, variables)
//! - **[script]** - The root node
//! - **[node]** - Borrowed tagged view over every node, plus the [`Visitor`] trait
//!
//! ## Quick Start
//!
//! ```text
//! people = EXTRACT * FROM "people.csv";
//! adults = SELECT name, age FROM people WHERE {{ age >= 18 }};
//! OUTPUT adults TO "adults.csv";
//! ```
//!
//! ## Core Concepts
//!
//! ### Sources
//!
//! A source emits a field schema once, then records. `EXTRACT` reads a file,
//! `SELECT` projects and filters another source, `JOIN` combines two sources,
//! and a bare identifier refers to a name assigned earlier in the script.
//!
//! ### Opaque expressions
//!
//! Anything between `{{` and `}}` is host-language code. It is never parsed,
//! only carried through to the generated output.
//!
//! ### Ownership
//!
//! Every node owns its defining [`Token`], which gives diagnostics a source
//! position. The tree is strictly owned; identifier references are resolved
//! by name during code generation, never through pointers.
//!
//! ## Examples
//!
//! ### Chained joins
//!
//! ```text
//! x = SELECT * FROM a INNER JOIN b ON {{ a.id == b.id }} LEFT JOIN c ON {{ b.id == c.id }};
//! ```
//!
//! Joins fold to the left, so the outer node is the `LEFT JOIN` and its left
//! side is the `INNER JOIN` of `a` and `b`.
//!
//! ### Parameters
//!
//! ```text
//! PARAM @min_age : number = 18;
//! ```
pub mod fields;
pub mod node;
pub mod script;
pub mod sources;
pub mod statements;
pub mod tokens;

pub use fields::{
    AliasedField, BooleanLiteral, Field, FieldList, FieldSpec, Identifier, InputField,
    NumberLiteral, Star, StringLiteral, TsExpression,
};
pub use node::{Node, Visitor};
pub use script::Script;
pub use sources::{AliasedSource, FileSource, JoinQuery, SelectQuery, Source, WhereStatement};
pub use statements::{
    Assignment, Export, Import, Output, Param, Statement, TypedField, VariableAssignment,
    VariableDefinition, VariableIdentifier, VariableValue,
};
pub use tokens::{Literal, Token, TokenKind};
