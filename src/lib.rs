pub mod ast;
pub mod cli;
pub mod codegen;
pub mod compile;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod snippet;

pub use ast::{Node, Script, Statement, Token, TokenKind, Visitor};
pub use codegen::{Backend, CodegenContext, CodegenError, JoinType};
pub use compile::{Diagnostic, Stage, compile, compile_with};
pub use config::Config;
pub use lexer::{LexError, LexErrorKind, Lexer, scan, tokenize};
pub use parser::{ParseError, ParseErrorKind, Parser, parse};
pub use snippet::{FileSnippets, MemorySnippets, SnippetError, SnippetProvider};
