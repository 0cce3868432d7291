use std::fmt;

use rust_decimal::Decimal;

/// Kind of a lexical token.
///
/// The lexer and parser share this vocabulary. Literal payloads live on
/// [`Token::value`], so the kind itself is a plain tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    /// Statement terminator
    Semicolon,

    /// Separator between fields
    Comma,

    /// All-fields marker
    ///
    /// # Examples
    /// ```text
    /// EXTRACT * FROM "people.csv"
    /// ```
    Star,

    /// Assignment or default value
    Equal,

    /// Left parenthesis for nested sources
    LParen,

    /// Right parenthesis
    RParen,

    /// Namespace separator in qualified fields
    ///
    /// # Examples
    /// ```text
    /// SELECT p.name FROM people AS p
    /// ```
    Dot,

    /// Type annotation separator
    ///
    /// # Examples
    /// ```text
    /// PARAM @limit : number;
    /// ```
    Colon,

    /// Variable prefix
    At,

    /// Single `{` not opening an expression
    LBrace,

    /// Single `}`
    RBrace,

    // Keywords
    Select,
    From,
    Extract,
    Output,
    Where,
    As,
    To,
    Inner,
    Left,
    Right,
    Outer,
    Join,
    On,
    Param,
    Import,
    Export,

    // Directives
    /// `#DECLARE`
    Declare,
    /// `#SET`
    Set,
    /// `#IF`
    If,
    /// `#ELSE`
    Else,
    /// `#END`
    End,
    /// `#ERROR`
    Error,
    /// `#WARN`
    Warn,

    // Literals
    /// Double-quoted string, raw interior text as value
    ///
    /// # Examples
    /// ```text
    /// "people.csv"
    /// "tab\there"
    /// ```
    String,

    /// Whole number
    Integer,

    /// Number with a fractional part
    Decimal,

    /// `true` or `false`
    Boolean,

    /// Name of a source, field, variable or type
    Identifier,

    /// Opaque host-language expression between `{{` and `}}`
    ///
    /// # Examples
    /// ```text
    /// {{ person.age > 18 }}
    /// ```
    TsExpression,

    /// End of input
    EndOfFile,
}

impl TokenKind {
    /// Returns the reserved-word kind for `word`, matched case-sensitively.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "SELECT" => TokenKind::Select,
            "OUTPUT" => TokenKind::Output,
            "EXTRACT" => TokenKind::Extract,
            "FROM" => TokenKind::From,
            "INNER" => TokenKind::Inner,
            "OUTER" => TokenKind::Outer,
            "JOIN" => TokenKind::Join,
            "LEFT" => TokenKind::Left,
            "RIGHT" => TokenKind::Right,
            "ON" => TokenKind::On,
            "WHERE" => TokenKind::Where,
            "AS" => TokenKind::As,
            "TO" => TokenKind::To,
            "true" | "false" => TokenKind::Boolean,
            "PARAM" => TokenKind::Param,
            "IMPORT" => TokenKind::Import,
            "EXPORT" => TokenKind::Export,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the directive kind for the word following `#`.
    pub fn directive(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "DECLARE" => TokenKind::Declare,
            "SET" => TokenKind::Set,
            "IF" => TokenKind::If,
            "ELSE" => TokenKind::Else,
            "END" => TokenKind::End,
            "WARN" => TokenKind::Warn,
            "ERROR" => TokenKind::Error,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_directive(self) -> bool {
        matches!(
            self,
            TokenKind::Declare
                | TokenKind::Set
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::Error
                | TokenKind::Warn
        )
    }

    pub fn is_join_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Inner | TokenKind::Left | TokenKind::Right | TokenKind::Outer
        )
    }

    /// Human-readable description used in parse diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Star => "'*'",
            TokenKind::Equal => "'='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Dot => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::At => "'@'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::Extract => "EXTRACT",
            TokenKind::Output => "OUTPUT",
            TokenKind::Where => "WHERE",
            TokenKind::As => "AS",
            TokenKind::To => "TO",
            TokenKind::Inner => "INNER",
            TokenKind::Left => "LEFT",
            TokenKind::Right => "RIGHT",
            TokenKind::Outer => "OUTER",
            TokenKind::Join => "JOIN",
            TokenKind::On => "ON",
            TokenKind::Param => "PARAM",
            TokenKind::Import => "IMPORT",
            TokenKind::Export => "EXPORT",
            TokenKind::Declare => "#DECLARE",
            TokenKind::Set => "#SET",
            TokenKind::If => "#IF",
            TokenKind::Else => "#ELSE",
            TokenKind::End => "#END",
            TokenKind::Error => "#ERROR",
            TokenKind::Warn => "#WARN",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Boolean => "boolean",
            TokenKind::Identifier => "identifier",
            TokenKind::TsExpression => "expression",
            TokenKind::EndOfFile => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Literal payload carried by a token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Raw text: string interior, identifier name or expression code
    String(String),

    /// Integer and decimal numbers, kept exact
    Decimal(Decimal),

    Boolean(bool),
}

/// A lexical token with the position where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<Literal>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Token {
            kind,
            value: None,
            line,
            column,
        }
    }

    pub fn with_value(kind: TokenKind, value: Literal, line: usize, column: usize) -> Self {
        Token {
            kind,
            value: Some(value),
            line,
            column,
        }
    }

    /// Text payload of string, identifier and expression tokens.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(Literal::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn decimal(&self) -> Option<Decimal> {
        match self.value {
            Some(Literal::Decimal(d)) => Some(d),
            _ => None,
        }
    }

    pub fn boolean(&self) -> Option<bool> {
        match self.value {
            Some(Literal::Boolean(b)) => Some(b),
            _ => None,
        }
    }

    /// `"line:column"` form used in generated diagnostics.
    pub fn position(&self) -> String {
        format!("{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(Literal::String(s)) if self.kind == TokenKind::String => {
                write!(f, "{} \"{}\"", self.kind, s)
            }
            Some(Literal::String(s)) => write!(f, "{} '{}'", self.kind, s),
            Some(Literal::Decimal(d)) => write!(f, "{} {}", self.kind, d),
            Some(Literal::Boolean(b)) => write!(f, "{} {}", self.kind, b),
            None => write!(f, "{}", self.kind),
        }
    }
}
