use crate::error;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;

/// Owns the interpreter for a whole session. In the REPL that means the
/// globals frame and the accumulated side table survive from line to line,
/// so a function defined on one line is callable on the next.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    pub fn run_file(&mut self, path: &str) -> anyhow::Result<()> {
        let source =
            fs::read_to_string(path).with_context(|| format!("Failed to read file {path}"))?;
        self.run(source);
        Ok(())
    }

    /// Reads one line per iteration. An empty line, end of input, or an
    /// interrupt ends the session. Diagnostics never end it: both error
    /// flags reset so the next line starts clean.
    pub fn run_prompt(&mut self) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new()?;

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.is_empty() {
                        break;
                    }
                    let _ = editor.add_history_entry(&line);
                    self.run(line);
                    error::reset();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => return Err(error.into()),
            }
        }

        Ok(())
    }

    /// The pipeline: scan, parse, resolve, interpret. Each stage runs only
    /// on the previous stage's clean output; a diagnostic anywhere
    /// suppresses everything downstream.
    fn run(&mut self, source: String) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();
        if error::had_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();
        if error::had_error() {
            return;
        }

        let locals = Resolver::new().resolve(&statements);
        if error::had_error() {
            return;
        }

        self.interpreter.add_locals(locals);
        self.interpreter.interpret(&statements);
    }
}
