use crate::ast::{
    AliasedField, AliasedSource, Assignment, BooleanLiteral, Export, Field, FieldList, FieldSpec,
    FileSource, Identifier, Import, InputField, JoinQuery, NumberLiteral, Output, Param, Script,
    SelectQuery, Source, Star, Statement, StringLiteral, Token, TsExpression, TypedField,
    VariableAssignment, VariableDefinition, VariableIdentifier, VariableValue, WhereStatement,
};

/// Borrowed view of any tree node, tagged by variant.
///
/// Grammar-role enums ([`Statement`], [`Source`], [`Field`], ...) convert into
/// this view so a [`Visitor`] can dispatch on one closed set.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Script(&'a Script),
    Assignment(&'a Assignment),
    Output(&'a Output),
    Param(&'a Param),
    Import(&'a Import),
    Export(&'a Export),
    VariableAssignment(&'a VariableAssignment),
    VariableDefinition(&'a VariableDefinition),
    TypedField(&'a TypedField),
    VariableIdentifier(&'a VariableIdentifier),
    FileSource(&'a FileSource),
    Identifier(&'a Identifier),
    SelectQuery(&'a SelectQuery),
    AliasedSource(&'a AliasedSource),
    JoinQuery(&'a JoinQuery),
    WhereStatement(&'a WhereStatement),
    Star(&'a Star),
    FieldList(&'a FieldList),
    InputField(&'a InputField),
    AliasedField(&'a AliasedField),
    StringLiteral(&'a StringLiteral),
    NumberLiteral(&'a NumberLiteral),
    BooleanLiteral(&'a BooleanLiteral),
    TsExpression(&'a TsExpression),
}

impl<'a> Node<'a> {
    /// Defining token of the node.
    pub fn token(&self) -> &'a Token {
        match *self {
            Node::Script(n) => &n.token,
            Node::Assignment(n) => &n.token,
            Node::Output(n) => &n.token,
            Node::Param(n) => &n.token,
            Node::Import(n) => &n.token,
            Node::Export(n) => &n.token,
            Node::VariableAssignment(n) => &n.token,
            Node::VariableDefinition(n) => &n.token,
            Node::TypedField(n) => &n.token,
            Node::VariableIdentifier(n) => &n.token,
            Node::FileSource(n) => &n.token,
            Node::Identifier(n) => &n.token,
            Node::SelectQuery(n) => &n.token,
            Node::AliasedSource(n) => &n.token,
            Node::JoinQuery(n) => &n.token,
            Node::WhereStatement(n) => &n.token,
            Node::Star(n) => &n.token,
            Node::FieldList(n) => &n.token,
            Node::InputField(n) => &n.token,
            Node::AliasedField(n) => &n.token,
            Node::StringLiteral(n) => &n.token,
            Node::NumberLiteral(n) => &n.token,
            Node::BooleanLiteral(n) => &n.token,
            Node::TsExpression(n) => &n.token,
        }
    }

    /// Variant tag, e.g. `"JoinQuery"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Script(_) => "Script",
            Node::Assignment(_) => "Assignment",
            Node::Output(_) => "Output",
            Node::Param(_) => "Param",
            Node::Import(_) => "Import",
            Node::Export(_) => "Export",
            Node::VariableAssignment(_) => "VariableAssignment",
            Node::VariableDefinition(_) => "VariableDefinition",
            Node::TypedField(_) => "TypedField",
            Node::VariableIdentifier(_) => "VariableIdentifier",
            Node::FileSource(_) => "FileSource",
            Node::Identifier(_) => "Identifier",
            Node::SelectQuery(_) => "SelectQuery",
            Node::AliasedSource(_) => "AliasedSource",
            Node::JoinQuery(_) => "JoinQuery",
            Node::WhereStatement(_) => "WhereStatement",
            Node::Star(_) => "Star",
            Node::FieldList(_) => "FieldList",
            Node::InputField(_) => "InputField",
            Node::AliasedField(_) => "AliasedField",
            Node::StringLiteral(_) => "StringLiteral",
            Node::NumberLiteral(_) => "NumberLiteral",
            Node::BooleanLiteral(_) => "BooleanLiteral",
            Node::TsExpression(_) => "TsExpression",
        }
    }
}

impl<'a> From<&'a Script> for Node<'a> {
    fn from(script: &'a Script) -> Self {
        Node::Script(script)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(statement: &'a Statement) -> Self {
        match statement {
            Statement::Assignment(s) => Node::Assignment(s),
            Statement::Output(s) => Node::Output(s),
            Statement::Param(s) => Node::Param(s),
            Statement::Import(s) => Node::Import(s),
            Statement::Export(s) => Node::Export(s),
            Statement::VariableAssignment(s) => Node::VariableAssignment(s),
            Statement::VariableDefinition(s) => Node::VariableDefinition(s),
        }
    }
}

impl<'a> From<&'a Source> for Node<'a> {
    fn from(source: &'a Source) -> Self {
        match source {
            Source::File(s) => Node::FileSource(s),
            Source::Identifier(s) => Node::Identifier(s),
            Source::Select(s) => Node::SelectQuery(s),
            Source::Aliased(s) => Node::AliasedSource(s),
            Source::Join(s) => Node::JoinQuery(s),
        }
    }
}

impl<'a> From<&'a FieldSpec> for Node<'a> {
    fn from(spec: &'a FieldSpec) -> Self {
        match spec {
            FieldSpec::Star(s) => Node::Star(s),
            FieldSpec::List(l) => Node::FieldList(l),
        }
    }
}

impl<'a> From<&'a Field> for Node<'a> {
    fn from(field: &'a Field) -> Self {
        match field {
            Field::Input(f) => Node::InputField(f),
            Field::Aliased(f) => Node::AliasedField(f),
            Field::String(f) => Node::StringLiteral(f),
            Field::Number(f) => Node::NumberLiteral(f),
            Field::Boolean(f) => Node::BooleanLiteral(f),
            Field::Expression(f) => Node::TsExpression(f),
        }
    }
}

impl<'a> From<&'a VariableValue> for Node<'a> {
    fn from(value: &'a VariableValue) -> Self {
        match value {
            VariableValue::String(v) => Node::StringLiteral(v),
            VariableValue::Number(v) => Node::NumberLiteral(v),
            VariableValue::Boolean(v) => Node::BooleanLiteral(v),
            VariableValue::Variable(v) => Node::VariableIdentifier(v),
            VariableValue::Expression(v) => Node::TsExpression(v),
        }
    }
}

/// Tree walker with one method per node variant.
///
/// [`Visitor::visit`] is the single entry point; it matches the node tag and
/// delegates to the variant method.
pub trait Visitor {
    type Output;

    fn visit(&mut self, node: Node<'_>) -> Self::Output {
        match node {
            Node::Script(n) => self.visit_script(n),
            Node::Assignment(n) => self.visit_assignment(n),
            Node::Output(n) => self.visit_output(n),
            Node::Param(n) => self.visit_param(n),
            Node::Import(n) => self.visit_import(n),
            Node::Export(n) => self.visit_export(n),
            Node::VariableAssignment(n) => self.visit_variable_assignment(n),
            Node::VariableDefinition(n) => self.visit_variable_definition(n),
            Node::TypedField(n) => self.visit_typed_field(n),
            Node::VariableIdentifier(n) => self.visit_variable_identifier(n),
            Node::FileSource(n) => self.visit_file_source(n),
            Node::Identifier(n) => self.visit_identifier(n),
            Node::SelectQuery(n) => self.visit_select_query(n),
            Node::AliasedSource(n) => self.visit_aliased_source(n),
            Node::JoinQuery(n) => self.visit_join_query(n),
            Node::WhereStatement(n) => self.visit_where_statement(n),
            Node::Star(n) => self.visit_star(n),
            Node::FieldList(n) => self.visit_field_list(n),
            Node::InputField(n) => self.visit_input_field(n),
            Node::AliasedField(n) => self.visit_aliased_field(n),
            Node::StringLiteral(n) => self.visit_string_literal(n),
            Node::NumberLiteral(n) => self.visit_number_literal(n),
            Node::BooleanLiteral(n) => self.visit_boolean_literal(n),
            Node::TsExpression(n) => self.visit_ts_expression(n),
        }
    }

    fn visit_script(&mut self, node: &Script) -> Self::Output;
    fn visit_assignment(&mut self, node: &Assignment) -> Self::Output;
    fn visit_output(&mut self, node: &Output) -> Self::Output;
    fn visit_param(&mut self, node: &Param) -> Self::Output;
    fn visit_import(&mut self, node: &Import) -> Self::Output;
    fn visit_export(&mut self, node: &Export) -> Self::Output;
    fn visit_variable_assignment(&mut self, node: &VariableAssignment) -> Self::Output;
    fn visit_variable_definition(&mut self, node: &VariableDefinition) -> Self::Output;
    fn visit_typed_field(&mut self, node: &TypedField) -> Self::Output;
    fn visit_variable_identifier(&mut self, node: &VariableIdentifier) -> Self::Output;
    fn visit_file_source(&mut self, node: &FileSource) -> Self::Output;
    fn visit_identifier(&mut self, node: &Identifier) -> Self::Output;
    fn visit_select_query(&mut self, node: &SelectQuery) -> Self::Output;
    fn visit_aliased_source(&mut self, node: &AliasedSource) -> Self::Output;
    fn visit_join_query(&mut self, node: &JoinQuery) -> Self::Output;
    fn visit_where_statement(&mut self, node: &WhereStatement) -> Self::Output;
    fn visit_star(&mut self, node: &Star) -> Self::Output;
    fn visit_field_list(&mut self, node: &FieldList) -> Self::Output;
    fn visit_input_field(&mut self, node: &InputField) -> Self::Output;
    fn visit_aliased_field(&mut self, node: &AliasedField) -> Self::Output;
    fn visit_string_literal(&mut self, node: &StringLiteral) -> Self::Output;
    fn visit_number_literal(&mut self, node: &NumberLiteral) -> Self::Output;
    fn visit_boolean_literal(&mut self, node: &BooleanLiteral) -> Self::Output;
    fn visit_ts_expression(&mut self, node: &TsExpression) -> Self::Output;
}
