use rust_decimal::Decimal;

use crate::ast::Token;

/// Name of a source, field, alias or type.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

/// String literal, raw interior text with escapes left in place.
///
/// # Example
/// ```text
/// "people.csv"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

/// Integer or decimal literal.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub token: Token,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

/// Opaque host-language expression, passed through verbatim.
///
/// # Example
/// ```text
/// {{ person.age >= 18 }}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TsExpression {
    pub token: Token,
    pub code: String,
}

/// Field read from the input record, optionally qualified by a namespace.
///
/// # Examples
/// ```text
/// name
/// p.name
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub token: Token,
    pub namespace: Option<Identifier>,
    pub name: Identifier,
}

impl InputField {
    /// `namespace.name`, or `name` when unqualified.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns.name, self.name.name),
            None => self.name.name.clone(),
        }
    }
}

/// Field value renamed in the output header.
///
/// # Example
/// ```text
/// p.name AS person
/// {{ a.price * 2 }} AS double
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AliasedField {
    pub token: Token,
    pub value: Box<Field>,
    pub alias: Identifier,
}

/// One output column specification.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Input(InputField),
    Aliased(AliasedField),
    String(StringLiteral),
    Number(NumberLiteral),
    Boolean(BooleanLiteral),
    Expression(TsExpression),
}

impl Field {
    pub fn token(&self) -> &Token {
        match self {
            Field::Input(f) => &f.token,
            Field::Aliased(f) => &f.token,
            Field::String(f) => &f.token,
            Field::Number(f) => &f.token,
            Field::Boolean(f) => &f.token,
            Field::Expression(f) => &f.token,
        }
    }
}

/// All fields marker (`*`).
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub token: Token,
}

/// Ordered, non-empty list of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    pub token: Token,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    Star(Star),
    List(FieldList),
}

impl FieldSpec {
    pub fn token(&self) -> &Token {
        match self {
            FieldSpec::Star(s) => &s.token,
            FieldSpec::List(l) => &l.token,
        }
    }
}
