use crate::token::Token;
use crate::value::object::Object;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stable identity for an expression node. The resolver's side table is keyed
/// by this id, never by the node's contents: two structurally identical
/// `Variable` nodes in different scopes must not collapse into one entry.
/// Ids are process-unique so a REPL session can keep extending a single
/// accumulated table across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

impl ExprId {
    pub fn next() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        ExprId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Expr is one of the two node types in the Abstract Syntax Tree. Only the
/// name-resolving variants (`Variable`, `Assign`, `This`, `Super`) carry an
/// `ExprId`; nothing else is ever looked up in the side table.
#[derive(Clone, Debug)]
pub enum Expr {
    Literal {
        value: Object,
    },
    Grouping {
        expression: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// Short-circuit 'and'/'or'. Kept apart from Binary because the right
    /// operand must not be evaluated when the left decides the result.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        id: ExprId,
        name: Token,
    },
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        /// The closing parenthesis; runtime errors for the call are anchored
        /// to this token's line.
        paren: Token,
        arguments: Vec<Expr>,
    },
    Get {
        object: Box<Expr>,
        name: Token,
    },
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },
    This {
        id: ExprId,
        keyword: Token,
    },
    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },
    /// A bracketed list literal: [1, 2, 3]. Evaluates to an instance of the
    /// built-in List class.
    ListInitializer {
        items: Vec<Expr>,
    },
}
