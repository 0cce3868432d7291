use crate::ast::{
    BooleanLiteral, Identifier, NumberLiteral, Source, StringLiteral, Token, TsExpression,
};

/// Binds a source to a name.
///
/// # Example
/// ```text
/// people = EXTRACT * FROM "people.csv";
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub token: Token,
    pub name: Identifier,
    pub source: Source,
}

/// Writes a source to a file sink.
///
/// # Example
/// ```text
/// OUTPUT adults TO "adults.csv";
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub token: Token,
    pub source: Source,
    pub file_name: StringLiteral,
}

/// `@name : type` pair used by params and variable definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedField {
    pub token: Token,
    pub name: Identifier,
    pub type_name: Identifier,
}

/// Script parameter supplied by the caller of the generated pipeline.
///
/// # Example
/// ```text
/// PARAM @min_age : number = 18;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub token: Token,
    pub field: TypedField,
    pub default: Option<VariableValue>,
}

/// Binds a source exported by another generated module.
///
/// # Example
/// ```text
/// IMPORT people FROM "./people";
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub token: Token,
    pub name: Identifier,
    pub file_name: StringLiteral,
}

/// Exposes the latest binding of a name to other modules.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub token: Token,
    pub name: Identifier,
}

/// Typed variable definition.
///
/// # Example
/// ```text
/// @threshold : number = 10;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub token: Token,
    pub field: TypedField,
    pub value: VariableValue,
}

/// Re-assignment of an existing variable.
///
/// # Example
/// ```text
/// @threshold = @min_age;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAssignment {
    pub token: Token,
    pub name: Identifier,
    pub value: VariableValue,
}

/// Reference to a variable on the right-hand side (`@name`).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableIdentifier {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    String(StringLiteral),
    Number(NumberLiteral),
    Boolean(BooleanLiteral),
    Variable(VariableIdentifier),
    Expression(TsExpression),
}

impl VariableValue {
    pub fn token(&self) -> &Token {
        match self {
            VariableValue::String(v) => &v.token,
            VariableValue::Number(v) => &v.token,
            VariableValue::Boolean(v) => &v.token,
            VariableValue::Variable(v) => &v.token,
            VariableValue::Expression(v) => &v.token,
        }
    }
}

/// Top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(Assignment),
    Output(Output),
    Param(Param),
    Import(Import),
    Export(Export),
    VariableAssignment(VariableAssignment),
    VariableDefinition(VariableDefinition),
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Assignment(s) => &s.token,
            Statement::Output(s) => &s.token,
            Statement::Param(s) => &s.token,
            Statement::Import(s) => &s.token,
            Statement::Export(s) => &s.token,
            Statement::VariableAssignment(s) => &s.token,
            Statement::VariableDefinition(s) => &s.token,
        }
    }
}
