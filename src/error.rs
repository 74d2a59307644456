use crate::token::{Token, TokenType};
use crate::value::object::Object;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Everything that can unwind out of parsing or execution. `Return` is not a
/// diagnosis at all: it carries a return statement's value up through any
/// number of nested statements to the enclosing function call, which is the
/// one place that catches it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Syntax error. Already reported at the offending token; carried only
    /// to unwind to the enclosing declaration, where the parser recovers.
    #[error("parse error")]
    Parse,

    /// Runtime error, anchored at the token whose line the diagnostic will
    /// name.
    #[error("{message}")]
    Runtime { token: Token, message: String },

    /// A built-in failed with no token in reach. The call site converts this
    /// into `Runtime` anchored at the call's closing parenthesis.
    #[error("{0}")]
    Builtin(String),

    #[error("return")]
    Return(Object),
}

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// Scanner diagnostics carry a bare line number.
pub fn error(line: usize, message: &str) {
    report(line, "", message);
}

/// Parser and resolver diagnostics point at a token.
pub fn token_error(token: &Token, message: &str) {
    if token.token_type == TokenType::EOF {
        report(token.line, " at end", message);
    } else {
        report(token.line, &format!(" at '{}'", token.lexeme), message);
    }
}

/// Runtime diagnostics print the message first, then the line.
pub fn runtime_error(error: Error) {
    match error {
        Error::Runtime { token, message } => {
            eprintln!("{message}\n[line {}]", token.line);
        }
        other => eprintln!("{other}"),
    }
    HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
}

fn report(line: usize, location: &str, message: &str) {
    eprintln!("[line {line}] Error{location}: {message}");
    HAD_ERROR.store(true, Ordering::Relaxed);
}

pub fn had_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed)
}

pub fn had_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

/// Clears both flags. The REPL calls this between lines so one bad line
/// doesn't poison the next.
pub fn reset() {
    HAD_ERROR.store(false, Ordering::Relaxed);
    HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
}
