use thiserror::Error;
use tracing::debug;

use crate::ast::{
    AliasedField, AliasedSource, Assignment, BooleanLiteral, Export, Field, FieldList, FieldSpec,
    FileSource, Identifier, Import, InputField, JoinQuery, NumberLiteral, Output, Param, Script,
    SelectQuery, Source, Star, Statement, StringLiteral, Token, TokenKind, TsExpression,
    TypedField, VariableAssignment, VariableDefinition, VariableIdentifier, VariableValue,
    WhereStatement,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No statement starts with this token
    UnexpectedToken,

    /// A specific construct (keyword, `;`, identifier, ...) was missing
    ExpectedConstruct(String),

    /// Directives are lexed but have no statement form
    UnsupportedDirective,
}

/// A recoverable parse problem. The parser collects these instead of stopping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over a scanned token list.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParseError>,
}

/// Parses `tokens` into a script, collecting every statement-level error.
pub fn parse(tokens: Vec<Token>) -> (Script, Vec<ParseError>) {
    Parser::new(tokens).parse()
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::EndOfFile) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token::new(TokenKind::EndOfFile, line, column));
        }

        Parser {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    /// Parses the whole token list.
    ///
    /// A failing statement records its error and the parser resynchronizes at
    /// the next plausible statement start, so every malformed statement gets
    /// reported in one pass.
    pub fn parse(mut self) -> (Script, Vec<ParseError>) {
        let token = self.peek().clone();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    debug!(line = error.line, column = error.column, "{}", error.message);
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }

        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed script"
        );
        (Script { token, statements }, self.errors)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current + 1)
            .map_or(TokenKind::EndOfFile, |t| t.kind)
    }

    fn previous_kind(&self) -> Option<TokenKind> {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.kind)
    }

    fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::EndOfFile
    }

    /// Consumes the current token. The end-of-file token is never consumed.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(what))
        }
    }

    fn expected(&self, what: &str) -> ParseError {
        let token = self.peek();
        let message = if token.kind == TokenKind::EndOfFile {
            format!("Unexpected end of file, expected {}", what)
        } else {
            format!("Unexpected {}, expected {}", token, what)
        };

        ParseError {
            kind: ParseErrorKind::ExpectedConstruct(what.to_string()),
            message,
            line: token.line,
            column: token.column,
        }
    }

    /// EXTRACT is left out because it only occurs inside an assignment, and a
    /// bare identifier only counts when `=` follows so sources are skipped.
    fn at_statement_start(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Output
            | TokenKind::Param
            | TokenKind::Import
            | TokenKind::Export
            | TokenKind::At => true,
            TokenKind::Identifier => self.peek_next_kind() == TokenKind::Equal,
            _ => false,
        }
    }

    /// Discards tokens until just after a `;` or at a statement start.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous_kind() == Some(TokenKind::Semicolon) || self.at_statement_start() {
                return;
            }
            self.advance();
        }
    }
}

// Statements
impl Parser {
    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let statement = match self.peek_kind() {
            TokenKind::Identifier => Statement::Assignment(self.parse_assignment()?),
            TokenKind::Output => Statement::Output(self.parse_output()?),
            TokenKind::At => self.parse_variable()?,
            TokenKind::Param => Statement::Param(self.parse_param()?),
            TokenKind::Import => Statement::Import(self.parse_import()?),
            TokenKind::Export => Statement::Export(self.parse_export()?),
            kind if kind.is_directive() => {
                let token = self.advance();
                return Err(ParseError {
                    kind: ParseErrorKind::UnsupportedDirective,
                    message: format!("Directive {} is not supported", kind),
                    line: token.line,
                    column: token.column,
                });
            }
            _ => {
                let token = self.advance();
                return Err(ParseError {
                    kind: ParseErrorKind::UnexpectedToken,
                    message: format!("Unexpected {}, expected a statement", token),
                    line: token.line,
                    column: token.column,
                });
            }
        };

        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(statement)
    }

    fn parse_assignment(&mut self) -> ParseResult<Assignment> {
        let name = self.parse_identifier("a name")?;
        self.expect(TokenKind::Equal, "'='")?;
        let source = self.parse_source()?;

        Ok(Assignment {
            token: name.token.clone(),
            name,
            source,
        })
    }

    fn parse_output(&mut self) -> ParseResult<Output> {
        let token = self.advance(); // consume OUTPUT
        let source = self.parse_source()?;
        self.expect(TokenKind::To, "TO")?;
        let file_name = self.parse_string_literal("an output file name")?;

        Ok(Output {
            token,
            source,
            file_name,
        })
    }

    fn parse_param(&mut self) -> ParseResult<Param> {
        let token = self.advance(); // consume PARAM
        let at = self.expect(TokenKind::At, "'@'")?;
        let name = self.parse_identifier("a parameter name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let type_name = self.parse_identifier("a type name")?;

        let default = match self.match_kind(TokenKind::Equal) {
            Some(_) => Some(self.parse_variable_value()?),
            None => None,
        };

        Ok(Param {
            token,
            field: TypedField {
                token: at,
                name,
                type_name,
            },
            default,
        })
    }

    /// `@name : type = value` or `@name = value`.
    ///
    /// The colon after the name is the only point where the grammar looks
    /// ahead to choose between two statement forms.
    fn parse_variable(&mut self) -> ParseResult<Statement> {
        let token = self.advance(); // consume '@'
        let name = self.parse_identifier("a variable name")?;

        if self.match_kind(TokenKind::Colon).is_some() {
            let type_name = self.parse_identifier("a type name")?;
            self.expect(TokenKind::Equal, "'='")?;
            let value = self.parse_variable_value()?;

            Ok(Statement::VariableDefinition(VariableDefinition {
                token: token.clone(),
                field: TypedField {
                    token,
                    name,
                    type_name,
                },
                value,
            }))
        } else {
            self.expect(TokenKind::Equal, "':' or '='")?;
            let value = self.parse_variable_value()?;

            Ok(Statement::VariableAssignment(VariableAssignment {
                token,
                name,
                value,
            }))
        }
    }

    fn parse_import(&mut self) -> ParseResult<Import> {
        let token = self.advance(); // consume IMPORT
        let name = self.parse_identifier("an imported name")?;
        self.expect(TokenKind::From, "FROM")?;
        let file_name = self.parse_string_literal("a module path")?;

        Ok(Import {
            token,
            name,
            file_name,
        })
    }

    fn parse_export(&mut self) -> ParseResult<Export> {
        let token = self.advance(); // consume EXPORT
        let name = self.parse_identifier("an exported name")?;
        Ok(Export { token, name })
    }

    fn parse_variable_value(&mut self) -> ParseResult<VariableValue> {
        let value = match self.peek_kind() {
            TokenKind::String => VariableValue::String(self.parse_string_literal("a value")?),
            TokenKind::Integer | TokenKind::Decimal => {
                VariableValue::Number(self.parse_number_literal())
            }
            TokenKind::Boolean => VariableValue::Boolean(self.parse_boolean_literal()),
            TokenKind::TsExpression => {
                VariableValue::Expression(self.parse_ts_expression("an expression")?)
            }
            TokenKind::At => {
                let token = self.advance();
                let name = self.parse_identifier("a variable name")?;
                VariableValue::Variable(VariableIdentifier {
                    token,
                    name: name.name,
                })
            }
            _ => return Err(self.expected("a literal, '@variable' or expression")),
        };
        Ok(value)
    }
}

// Sources
impl Parser {
    fn parse_source(&mut self) -> ParseResult<Source> {
        match self.peek_kind() {
            TokenKind::Extract => Ok(Source::File(self.parse_file_source()?)),
            TokenKind::Select => Ok(Source::Select(self.parse_select_query()?)),
            TokenKind::Identifier => Ok(Source::Identifier(self.parse_identifier("a source")?)),
            TokenKind::LParen => {
                self.advance();
                let source = self.parse_select_source()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(source)
            }
            _ => Err(self.expected("a source (EXTRACT, SELECT or a name)")),
        }
    }

    fn parse_file_source(&mut self) -> ParseResult<FileSource> {
        let token = self.advance(); // consume EXTRACT
        let field_spec = self.parse_field_spec()?;
        self.expect(TokenKind::From, "FROM")?;
        let file_name = self.parse_string_literal("a file name")?;

        Ok(FileSource {
            token,
            field_spec,
            file_name,
        })
    }

    fn parse_select_query(&mut self) -> ParseResult<SelectQuery> {
        let token = self.advance(); // consume SELECT
        let field_spec = self.parse_field_spec()?;
        self.expect(TokenKind::From, "FROM")?;
        let source = self.parse_select_source()?;

        let where_clause = match self.match_kind(TokenKind::Where) {
            Some(token) => Some(WhereStatement {
                token,
                condition: self.parse_ts_expression("a condition expression")?,
            }),
            None => None,
        };

        Ok(SelectQuery {
            token,
            field_spec,
            source: Box::new(source),
            where_clause,
        })
    }

    /// Sources joined left to right.
    ///
    /// Each join wraps everything parsed so far as its left side, so
    /// `a JOIN b ON .. JOIN c ON ..` becomes `Join(Join(a, b), c)`.
    fn parse_select_source(&mut self) -> ParseResult<Source> {
        let mut source = self.parse_aliasable_source()?;

        while self.peek_kind().is_join_operator() {
            let token = self.advance();
            self.expect(TokenKind::Join, "JOIN")?;
            let right = self.parse_aliasable_source()?;
            self.expect(TokenKind::On, "ON")?;
            let condition = self.parse_ts_expression("a join condition")?;

            source = Source::Join(JoinQuery {
                token,
                left: Box::new(source),
                right: Box::new(right),
                condition,
            });
        }

        Ok(source)
    }

    fn parse_aliasable_source(&mut self) -> ParseResult<Source> {
        let source = self.parse_source()?;

        match self.match_kind(TokenKind::As) {
            Some(token) => Ok(Source::Aliased(AliasedSource {
                token,
                source: Box::new(source),
                alias: self.parse_identifier("a source alias")?,
            })),
            None => Ok(source),
        }
    }
}

// Fields and literals
impl Parser {
    fn parse_field_spec(&mut self) -> ParseResult<FieldSpec> {
        if let Some(token) = self.match_kind(TokenKind::Star) {
            return Ok(FieldSpec::Star(Star { token }));
        }

        let token = self.peek().clone();
        let mut fields = vec![self.parse_field()?];
        while self.match_kind(TokenKind::Comma).is_some() {
            fields.push(self.parse_field()?);
        }

        Ok(FieldSpec::List(FieldList { token, fields }))
    }

    fn parse_field(&mut self) -> ParseResult<Field> {
        let value = match self.peek_kind() {
            TokenKind::TsExpression => Field::Expression(self.parse_ts_expression("a field")?),
            TokenKind::String => Field::String(self.parse_string_literal("a field")?),
            TokenKind::Integer | TokenKind::Decimal => Field::Number(self.parse_number_literal()),
            TokenKind::Boolean => Field::Boolean(self.parse_boolean_literal()),
            TokenKind::Identifier => {
                let first = self.parse_identifier("a field")?;
                let token = first.token.clone();

                if self.match_kind(TokenKind::Dot).is_some() {
                    let name = self.parse_identifier("a field name after '.'")?;
                    Field::Input(InputField {
                        token,
                        namespace: Some(first),
                        name,
                    })
                } else {
                    Field::Input(InputField {
                        token,
                        namespace: None,
                        name: first,
                    })
                }
            }
            _ => return Err(self.expected("'*' or a field")),
        };

        match self.match_kind(TokenKind::As) {
            Some(token) => Ok(Field::Aliased(AliasedField {
                token,
                value: Box::new(value),
                alias: self.parse_identifier("a field alias")?,
            })),
            None => Ok(value),
        }
    }

    fn parse_identifier(&mut self, what: &str) -> ParseResult<Identifier> {
        let token = self.expect(TokenKind::Identifier, what)?;
        let name = token.text().unwrap_or_default().to_string();
        Ok(Identifier { token, name })
    }

    fn parse_string_literal(&mut self, what: &str) -> ParseResult<StringLiteral> {
        let token = self.expect(TokenKind::String, what)?;
        let value = token.text().unwrap_or_default().to_string();
        Ok(StringLiteral { token, value })
    }

    fn parse_ts_expression(&mut self, what: &str) -> ParseResult<TsExpression> {
        let token = self.expect(TokenKind::TsExpression, what)?;
        let code = token.text().unwrap_or_default().to_string();
        Ok(TsExpression { token, code })
    }

    /// Caller has checked the current token is a number.
    fn parse_number_literal(&mut self) -> NumberLiteral {
        let token = self.advance();
        let value = token.decimal().unwrap_or_default();
        NumberLiteral { token, value }
    }

    /// Caller has checked the current token is a boolean.
    fn parse_boolean_literal(&mut self) -> BooleanLiteral {
        let token = self.advance();
        let value = token.boolean().unwrap_or_default();
        BooleanLiteral { token, value }
    }
}
