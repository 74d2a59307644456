mod environment;
mod error;
mod expr;
mod interpreter;
mod lox;
mod native_functions;
mod parser;
mod resolver;
mod scanner;
mod stmt;
mod token;
mod value;

use crate::lox::Lox;
use std::env;
use std::process::exit;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut lox = Lox::new();
    match args.len() {
        1 => lox.run_prompt()?,
        2 => lox.run_file(&args[1])?,
        _ => {
            eprintln!("Usage: plox [script]");
            exit(64);
        }
    }

    if error::had_error() {
        exit(65);
    }
    if error::had_runtime_error() {
        exit(70);
    }
    Ok(())
}
