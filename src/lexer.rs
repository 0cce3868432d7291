use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ast::{Literal, Token, TokenKind};

/// The kind of lexer error that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated block comment, expected '*/'")]
    UnterminatedComment,

    #[error("unterminated string literal, expected '\"'")]
    UnterminatedString,

    #[error("unterminated expression, expected '}}}}'")]
    UnterminatedExpression,

    #[error("unknown directive '#{0}'")]
    UnknownDirective(String),

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// A lexer error, positioned at the start of the offending construct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
    pub column: usize,
}

/// Single forward pass over a script.
///
/// The lexer is an iterator of tokens. It yields exactly one
/// [`TokenKind::EndOfFile`] token and then stops; after an error it stops as
/// well, so a scan is never restarted.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

/// Starts a lazy scan of `source`.
pub fn scan(source: &str) -> Lexer {
    Lexer::new(source)
}

/// Scans all of `source`, stopping at the first error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    scan(source).collect()
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn error(&self, kind: LexErrorKind, line: usize, column: usize) -> LexError {
        LexError { kind, line, column }
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.current_char() {
                Some(' ' | '\t' | '\r' | '\n') => self.advance(),
                Some('/') if self.peek_char(1) == Some('/') => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_char(1) == Some('*') => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // Consume '/'
        self.advance(); // Consume '*'

        loop {
            match self.current_char() {
                None => return Err(self.error(LexErrorKind::UnterminatedComment, line, column)),
                Some('*') if self.peek_char(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads up to an unescaped `terminator`, returning the raw text.
    ///
    /// A backslash toggles escaping, so `\\` leaves the following character
    /// unescaped. Escape sequences stay in the returned text.
    fn read_escaped_until(&mut self, terminator: &[char]) -> Option<String> {
        let mut result = String::new();
        let mut escaped = false;

        while let Some(ch) = self.current_char() {
            let closes = !escaped
                && terminator
                    .iter()
                    .enumerate()
                    .all(|(i, t)| self.peek_char(i) == Some(*t));
            if closes {
                for _ in terminator {
                    self.advance();
                }
                return Some(result);
            }

            escaped = ch == '\\' && !escaped;
            result.push(ch);
            self.advance();
        }
        None
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        self.advance(); // Consume opening quote
        match self.read_escaped_until(&['"']) {
            Some(text) => Ok(Token::with_value(
                TokenKind::String,
                Literal::String(text),
                line,
                column,
            )),
            None => Err(self.error(LexErrorKind::UnterminatedString, line, column)),
        }
    }

    fn read_expression(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        self.advance(); // Consume '{'
        self.advance(); // Consume '{'
        match self.read_escaped_until(&['}', '}']) {
            Some(code) => Ok(Token::with_value(
                TokenKind::TsExpression,
                Literal::String(code.trim().to_string()),
                line,
                column,
            )),
            None => Err(self.error(LexErrorKind::UnterminatedExpression, line, column)),
        }
    }

    fn read_directive(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        self.advance(); // Consume '#'
        let mut word = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphabetic() {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match TokenKind::directive(&word) {
            Some(kind) => Ok(Token::new(kind, line, column)),
            None => Err(self.error(LexErrorKind::UnknownDirective(word), line, column)),
        }
    }

    fn read_number(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        let mut number = String::new();
        let mut is_decimal = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_decimal
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_decimal = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = Decimal::from_str(&number)
            .map_err(|_| self.error(LexErrorKind::InvalidNumber(number.clone()), line, column))?;
        let kind = if is_decimal {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        };
        Ok(Token::with_value(kind, Literal::Decimal(value), line, column))
    }

    fn read_identifier(&mut self, line: usize, column: usize) -> Token {
        let word = self.read_word();

        match TokenKind::keyword(&word) {
            Some(TokenKind::Boolean) => Token::with_value(
                TokenKind::Boolean,
                Literal::Boolean(word == "true"),
                line,
                column,
            ),
            Some(kind) => Token::new(kind, line, column),
            None => Token::with_value(TokenKind::Identifier, Literal::String(word), line, column),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let (line, column) = (self.line, self.column);
        let single = |kind| Token::new(kind, line, column);

        let token = match self.current_char() {
            None => single(TokenKind::EndOfFile),
            Some(';') => single(TokenKind::Semicolon),
            Some(',') => single(TokenKind::Comma),
            Some('*') => single(TokenKind::Star),
            Some('=') => single(TokenKind::Equal),
            Some('(') => single(TokenKind::LParen),
            Some(')') => single(TokenKind::RParen),
            Some('.') => single(TokenKind::Dot),
            Some(':') => single(TokenKind::Colon),
            Some('@') => single(TokenKind::At),
            Some('}') => single(TokenKind::RBrace),
            Some('{') if self.peek_char(1) == Some('{') => {
                return self.read_expression(line, column);
            }
            Some('{') => single(TokenKind::LBrace),
            Some('#') => return self.read_directive(line, column),
            Some('"') => return self.read_string(line, column),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                return Ok(self.read_identifier(line, column));
            }
            Some(ch) if ch.is_ascii_digit() => return self.read_number(line, column),
            Some(ch) => {
                return Err(self.error(LexErrorKind::UnexpectedCharacter(ch), line, column));
            }
        };

        self.advance();
        Ok(token)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        match &result {
            Ok(token) if token.kind != TokenKind::EndOfFile => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

#[test]
fn test_keywords() {
    let kinds: Vec<TokenKind> = tokenize("SELECT FROM true select")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Select,
            TokenKind::From,
            TokenKind::Boolean,
            TokenKind::Identifier,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn test_stops_after_end_of_file() {
    let mut lexer = scan("a");
    assert!(lexer.next().is_some());
    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::EndOfFile);
    assert!(lexer.next().is_none());
}
