//! Tree-walking code generator.
//!
//! Each node renders to a string by filling a named snippet with the
//! rendered strings of its children. Cross-cutting state lives in a
//! [`CodegenContext`] owned by one [`Backend`] and reset on every render.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{
        AliasedField, AliasedSource, Assignment, BooleanLiteral, Export, Field, FieldList,
        FileSource, Identifier, Import, InputField, JoinQuery, Node, NumberLiteral, Output, Param,
        Script, SelectQuery, Source, Star, StringLiteral, Token, TokenKind, TsExpression,
        TypedField, VariableAssignment, VariableDefinition, VariableIdentifier, Visitor,
        WhereStatement,
    },
    snippet::{SnippetError, SnippetProvider},
};

/// Errors that abort code generation. There is no partial output.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("{source} (line {line}, column {column})")]
    Snippet {
        #[source]
        source: SnippetError,
        line: usize,
        column: usize,
    },

    #[error("unknown join type {kind} at line {line}, column {column}")]
    UnknownJoinType {
        kind: TokenKind,
        line: usize,
        column: usize,
    },

    /// Reference to a name with no earlier assignment
    #[error("'{name}' is used before it is assigned at line {line}, column {column}")]
    UnresolvedIdentifier {
        name: String,
        line: usize,
        column: usize,
    },

    /// Both sides of a join expose the same namespace to the condition
    #[error("'{name}' names both sides of a join at line {line}, column {column}")]
    DuplicateJoinName {
        name: String,
        line: usize,
        column: usize,
    },
}

impl CodegenError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            CodegenError::Snippet { line, column, .. }
            | CodegenError::UnknownJoinType { line, column, .. }
            | CodegenError::UnresolvedIdentifier { line, column, .. }
            | CodegenError::DuplicateJoinName { line, column, .. } => (*line, *column),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinType {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Inner => Some(JoinType::Inner),
            TokenKind::Left => Some(JoinType::Left),
            TokenKind::Right => Some(JoinType::Right),
            TokenKind::Outer => Some(JoinType::Outer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "Inner",
            JoinType::Left => "Left",
            JoinType::Right => "Right",
            JoinType::Outer => "Outer",
        }
    }
}

/// Mutable state of one render.
#[derive(Debug, Default)]
pub struct CodegenContext {
    /// Number of bindings made so far per source name
    bindings: HashMap<String, usize>,

    /// Hoisted join condition functions, in traversal order
    conditions: Vec<String>,

    outputs: usize,
}

impl CodegenContext {
    /// Binds `name` again and returns its new generated name (`name_0`, `name_1`, ...).
    pub fn bind(&mut self, name: &str) -> String {
        let count = self.bindings.entry(name.to_string()).or_insert(0);
        let variable = format!("{}_{}", name, count);
        *count += 1;
        variable
    }

    /// Generated name of the latest binding of `name`.
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.bindings
            .get(name)
            .map(|count| format!("{}_{}", name, count - 1))
    }

    pub fn next_condition_name(&self) -> String {
        format!("condition_{}", self.conditions.len())
    }

    pub fn push_condition(&mut self, rendered: String) {
        self.conditions.push(rendered);
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn next_output_name(&mut self) -> String {
        let name = format!("output_{}", self.outputs);
        self.outputs += 1;
        name
    }
}

/// Renders a script through a snippet provider.
pub struct Backend<'s> {
    snippets: &'s dyn SnippetProvider,
    context: CodegenContext,
}

/// Renders `script` with a fresh backend.
pub fn render(script: &Script, snippets: &dyn SnippetProvider) -> Result<String, CodegenError> {
    Backend::new(snippets).render(script)
}

fn quote(raw: &str) -> String {
    format!("\"{}\"", raw)
}

/// Namespaces a join side exposes, left to right.
///
/// Unaliased file sources and selects expose none.
fn namespaces<'a>(source: &'a Source, names: &mut Vec<&'a Identifier>) {
    match source {
        Source::Aliased(s) => names.push(&s.alias),
        Source::Identifier(s) => names.push(s),
        Source::Join(s) => {
            namespaces(&s.left, names);
            namespaces(&s.right, names);
        }
        Source::File(_) | Source::Select(_) => {}
    }
}

/// Condition parameter for one join side.
///
/// A joined side yields a record per namespace, so its parameter
/// destructures them: `{ a, b }`.
fn condition_parameter(source: &Source, names: &[&Identifier], fallback: &str) -> String {
    match (source, names) {
        (_, []) => fallback.to_string(),
        (Source::Join(_), names) => {
            let names: Vec<&str> = names.iter().map(|n| n.name.as_str()).collect();
            format!("{{ {} }}", names.join(", "))
        }
        (_, [name, ..]) => name.name.clone(),
    }
}

impl<'s> Backend<'s> {
    pub fn new(snippets: &'s dyn SnippetProvider) -> Self {
        Backend {
            snippets,
            context: CodegenContext::default(),
        }
    }

    pub fn render(&mut self, script: &Script) -> Result<String, CodegenError> {
        self.context = CodegenContext::default();
        let output = self.visit(Node::Script(script))?;
        debug!(
            conditions = self.context.conditions.len(),
            outputs = self.context.outputs,
            bytes = output.len(),
            "rendered script"
        );
        Ok(output)
    }

    fn snippet(
        &self,
        name: &str,
        token: &Token,
        substitutions: &[(&str, &str)],
    ) -> Result<String, CodegenError> {
        self.snippets
            .get(name, substitutions)
            .map_err(|source| CodegenError::Snippet {
                source,
                line: token.line,
                column: token.column,
            })
    }

    fn resolve(&self, name: &str, token: &Token) -> Result<String, CodegenError> {
        self.context
            .resolve(name)
            .ok_or_else(|| CodegenError::UnresolvedIdentifier {
                name: name.to_string(),
                line: token.line,
                column: token.column,
            })
    }

    /// Source under its namespace.
    fn namespaced(
        &self,
        source: &str,
        alias: &Identifier,
        token: &Token,
    ) -> Result<String, CodegenError> {
        let alias = quote(&alias.name);
        self.snippet("aliasedSource", token, &[("source", source), ("alias", &alias)])
    }

    /// A join side. A bare name joins under its own name as namespace.
    fn render_join_side(&mut self, source: &Source) -> Result<String, CodegenError> {
        match source {
            Source::Identifier(name) => {
                let resolved = self.visit(Node::Identifier(name))?;
                self.namespaced(&resolved, name, &name.token)
            }
            _ => self.visit(source.into()),
        }
    }

    /// Field as it appears in a field list; bare values get a header wrapper.
    fn render_field(&mut self, field: &Field) -> Result<String, CodegenError> {
        match field {
            Field::Input(_) | Field::Aliased(_) => self.visit(field.into()),
            _ => {
                let value = self.visit(field.into())?;
                self.snippet("unnamedField", field.token(), &[("value", &value)])
            }
        }
    }
}

impl Visitor for Backend<'_> {
    type Output = Result<String, CodegenError>;

    fn visit_script(&mut self, node: &Script) -> Self::Output {
        let statements = node
            .statements
            .iter()
            .map(|s| self.visit(s.into()))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");
        let conditions = self.context.conditions.join("\n\n");

        self.snippet(
            "script",
            &node.token,
            &[("statements", &statements), ("conditions", &conditions)],
        )
    }

    fn visit_assignment(&mut self, node: &Assignment) -> Self::Output {
        // The source may refer to the previous binding of the same name.
        let source = self.visit((&node.source).into())?;
        let variable = self.context.bind(&node.name.name);
        trace!(name = %node.name.name, %variable, "bound source");

        self.snippet(
            "assignment",
            &node.token,
            &[
                ("variableName", &variable),
                ("source", &source),
                ("name", &node.name.name),
            ],
        )
    }

    fn visit_output(&mut self, node: &Output) -> Self::Output {
        let source = self.visit((&node.source).into())?;
        let variable = self.context.next_output_name();
        let file_name = quote(&node.file_name.value);

        self.snippet(
            "output",
            &node.token,
            &[
                ("variableName", &variable),
                ("source", &source),
                ("fileName", &file_name),
            ],
        )
    }

    fn visit_param(&mut self, node: &Param) -> Self::Output {
        let name = self.visit(Node::TypedField(&node.field))?;
        let type_name = &node.field.type_name.name;

        match &node.default {
            Some(default) => {
                let default = self.visit(default.into())?;
                self.snippet(
                    "paramWithDefault",
                    &node.token,
                    &[("name", &name), ("type", type_name), ("default", &default)],
                )
            }
            None => self.snippet("param", &node.token, &[("name", &name), ("type", type_name)]),
        }
    }

    fn visit_import(&mut self, node: &Import) -> Self::Output {
        let variable = self.context.bind(&node.name.name);
        let file_name = quote(&node.file_name.value);
        trace!(name = %node.name.name, %variable, "bound import");

        self.snippet(
            "import",
            &node.token,
            &[
                ("variableName", &variable),
                ("name", &node.name.name),
                ("fileName", &file_name),
            ],
        )
    }

    fn visit_export(&mut self, node: &Export) -> Self::Output {
        let variable = self.resolve(&node.name.name, &node.name.token)?;

        self.snippet(
            "export",
            &node.token,
            &[("variableName", &variable), ("name", &node.name.name)],
        )
    }

    fn visit_variable_assignment(&mut self, node: &VariableAssignment) -> Self::Output {
        let value = self.visit((&node.value).into())?;
        self.snippet(
            "variableAssignment",
            &node.token,
            &[("name", &node.name.name), ("value", &value)],
        )
    }

    fn visit_variable_definition(&mut self, node: &VariableDefinition) -> Self::Output {
        let name = self.visit(Node::TypedField(&node.field))?;
        let value = self.visit((&node.value).into())?;

        self.snippet(
            "variableDefinition",
            &node.token,
            &[
                ("name", &name),
                ("type", &node.field.type_name.name),
                ("value", &value),
            ],
        )
    }

    fn visit_typed_field(&mut self, node: &TypedField) -> Self::Output {
        Ok(node.name.name.clone())
    }

    fn visit_variable_identifier(&mut self, node: &VariableIdentifier) -> Self::Output {
        Ok(node.name.clone())
    }

    fn visit_file_source(&mut self, node: &FileSource) -> Self::Output {
        let field_spec = self.visit((&node.field_spec).into())?;
        let file_name = quote(&node.file_name.value);

        self.snippet(
            "fileSource",
            &node.token,
            &[("fieldSpec", &field_spec), ("filename", &file_name)],
        )
    }

    fn visit_identifier(&mut self, node: &Identifier) -> Self::Output {
        self.resolve(&node.name, &node.token)
    }

    fn visit_select_query(&mut self, node: &SelectQuery) -> Self::Output {
        let source = self.visit(Node::from(&*node.source))?;
        let fields = self.visit((&node.field_spec).into())?;
        let where_clause = match &node.where_clause {
            Some(w) => self.visit(Node::WhereStatement(w))?,
            None => String::new(),
        };

        self.snippet(
            "selectQuery",
            &node.token,
            &[
                ("fields", &fields),
                ("source", &source),
                ("where", &where_clause),
            ],
        )
    }

    fn visit_aliased_source(&mut self, node: &AliasedSource) -> Self::Output {
        let source = self.visit(Node::from(&*node.source))?;
        self.namespaced(&source, &node.alias, &node.token)
    }

    fn visit_join_query(&mut self, node: &JoinQuery) -> Self::Output {
        let left = self.render_join_side(&node.left)?;
        let right = self.render_join_side(&node.right)?;
        let join_type =
            JoinType::from_token_kind(node.token.kind).ok_or(CodegenError::UnknownJoinType {
                kind: node.token.kind,
                line: node.token.line,
                column: node.token.column,
            })?;

        let (mut left_names, mut right_names) = (Vec::new(), Vec::new());
        namespaces(&node.left, &mut left_names);
        namespaces(&node.right, &mut right_names);
        if let Some(duplicate) = right_names
            .iter()
            .find(|r| left_names.iter().any(|l| l.name == r.name))
        {
            return Err(CodegenError::DuplicateJoinName {
                name: duplicate.name.clone(),
                line: duplicate.token.line,
                column: duplicate.token.column,
            });
        }

        let name = self.context.next_condition_name();
        let condition = self.visit(Node::TsExpression(&node.condition))?;
        let function = self.snippet(
            "joinCondition",
            &node.condition.token,
            &[
                ("name", &name),
                ("left", &condition_parameter(&node.left, &left_names, "left")),
                ("right", &condition_parameter(&node.right, &right_names, "right")),
                ("condition", &condition),
            ],
        )?;
        trace!(%name, join = join_type.as_str(), "hoisted join condition");
        self.context.push_condition(function);

        self.snippet(
            "joinQuery",
            &node.token,
            &[
                ("left", &left),
                ("right", &right),
                ("condition", &name),
                ("joinType", join_type.as_str()),
            ],
        )
    }

    fn visit_where_statement(&mut self, node: &WhereStatement) -> Self::Output {
        let condition = self.visit(Node::TsExpression(&node.condition))?;
        self.snippet("whereStatement", &node.token, &[("condition", &condition)])
    }

    fn visit_star(&mut self, node: &Star) -> Self::Output {
        self.snippet("star", &node.token, &[])
    }

    fn visit_field_list(&mut self, node: &FieldList) -> Self::Output {
        let fields = node
            .fields
            .iter()
            .map(|f| self.render_field(f))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        let position = quote(&node.token.position());

        self.snippet(
            "fieldList",
            &node.token,
            &[("fields", &fields), ("position", &position)],
        )
    }

    fn visit_input_field(&mut self, node: &InputField) -> Self::Output {
        Ok(quote(&node.qualified_name()))
    }

    fn visit_aliased_field(&mut self, node: &AliasedField) -> Self::Output {
        let alias = quote(&node.alias.name);

        match &*node.value {
            Field::Input(field) => {
                let field = self.visit(Node::InputField(field))?;
                self.snippet(
                    "renamedField",
                    &node.token,
                    &[("field", &field), ("name", &alias)],
                )
            }
            value => {
                let value = self.visit(value.into())?;
                self.snippet(
                    "namedField",
                    &node.token,
                    &[("name", &alias), ("value", &value)],
                )
            }
        }
    }

    fn visit_string_literal(&mut self, node: &StringLiteral) -> Self::Output {
        Ok(quote(&node.value))
    }

    fn visit_number_literal(&mut self, node: &NumberLiteral) -> Self::Output {
        Ok(node.value.to_string())
    }

    fn visit_boolean_literal(&mut self, node: &BooleanLiteral) -> Self::Output {
        Ok(node.value.to_string())
    }

    fn visit_ts_expression(&mut self, node: &TsExpression) -> Self::Output {
        Ok(node.code.clone())
    }
}
