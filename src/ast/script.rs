use crate::ast::{Statement, Token};

/// Root of the tree: statements in source order.
///
/// Order matters, later statements may refer to names bound by earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// First token of the script (end of file for an empty script)
    pub token: Token,

    pub statements: Vec<Statement>,
}
