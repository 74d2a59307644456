use crate::error;
use crate::token::TokenType::*;
use crate::token::{Literal, Token, TokenType};
use std::collections::HashMap;

/// The scanner takes in raw source code as a series of characters and groups
/// it into tokens, the meaningful "words" and "punctuation" of the grammar.
/// Invalid characters and unterminated strings are reported through the
/// line-level reporter and scanning continues, so one pass surfaces as many
/// lexical errors as possible.
pub struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,

    /// 'start' points to the first character of the lexeme being scanned,
    /// 'current' at the character currently being considered, and 'line'
    /// tracks which source line 'current' is on.
    start: usize,
    current: usize,
    line: usize,
}

impl Scanner {
    pub fn new(source: String) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: vec![],
            current: 0,
            start: 0,
            line: 1,
        }
    }

    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            // We are at the beginning of the next lexeme.
            self.start = self.current;
            self.scan_token();
        }
        self.tokens.push(Token::new(EOF, String::new(), None, self.line));
        self.tokens.clone()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) {
        let ln = self.line;
        let c = *self.advance().unwrap();
        match c {
            '(' => self.add_token(LEFT_PAREN),
            ')' => self.add_token(RIGHT_PAREN),
            '{' => self.add_token(LEFT_BRACE),
            '}' => self.add_token(RIGHT_BRACE),
            '[' => self.add_token(LEFT_BRACKET),
            ']' => self.add_token(RIGHT_BRACKET),
            ',' => self.add_token(COMMA),
            '.' => self.add_token(DOT),
            '-' => self.add_token(MINUS),
            '+' => self.add_token(PLUS),
            ';' => self.add_token(SEMICOLON),
            '*' => self.add_token(STAR),

            // Two-stage recognition for one-or-two character operators: we
            // know the lexeme starts with e.g. '!', and the next character
            // decides between '!=' and a bare '!'.
            '!' => match self.match_next('=') {
                true => self.add_token(BANG_EQUAL),
                false => self.add_token(BANG),
            },
            '=' => match self.match_next('=') {
                true => self.add_token(EQUAL_EQUAL),
                false => self.add_token(EQUAL),
            },
            '<' => match self.match_next('=') {
                true => self.add_token(LESS_EQUAL),
                false => self.add_token(LESS),
            },
            '>' => match self.match_next('=') {
                true => self.add_token(GREATER_EQUAL),
                false => self.add_token(GREATER),
            },

            // Whitespace is skipped; newlines also bump the line counter.
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,

            '/' => self.comment(),
            '"' => self.string(),
            d if is_digit(d) => self.number(),
            a if is_alpha(a) => self.identifier(),

            _ => {
                error::error(ln, "Unexpected character.");
            }
        }
    }

    fn comment(&mut self) {
        // A comment runs to the end of the line and produces no token.
        if self.match_next('/') {
            while self.peek() != '\n' && !self.is_at_end() {
                self.advance();
            }
        } else {
            self.add_token(SLASH)
        }
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            // Lox supports multi-line strings.
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            error::error(self.line, "Unterminated string.");
            return;
        }

        // The closing ".
        self.advance();

        // The token's value excludes the surrounding quotes.
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_token_with_literal(STRING, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while is_digit(self.peek()) {
            self.advance();
        }

        // A fractional part requires a digit after the '.', otherwise the
        // dot is left for property access.
        if self.peek() == '.' && is_digit(self.peek_next()) {
            self.advance();

            while is_digit(self.peek()) {
                self.advance();
            }
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let value: f64 = text.parse().unwrap();
        self.add_token_with_literal(NUMBER, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let token_type: TokenType = keywords().get(&*text).copied().unwrap_or(IDENTIFIER);
        self.add_token(token_type);
    }

    /// Consumes the next character in the source and returns it.
    fn advance(&mut self) -> Option<&char> {
        let res = self.source.get(self.current);
        self.current += 1;
        res
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_with_literal(token_type, None);
    }

    fn add_token_with_literal(&mut self, token_type: TokenType, literal: Option<Literal>) {
        let text = self.source[self.start..self.current].iter().collect();
        self.tokens.push(Token::new(token_type, text, literal, self.line));
    }

    /// A conditional advance(): consumes the current character only if it
    /// is the one we are looking for.
    fn match_next(&mut self, expected: char) -> bool {
        if self.is_at_end() {
            return false;
        }
        if self.source[self.current] != expected {
            return false;
        }

        self.current += 1;
        true
    }

    /// One character of lookahead without consuming.
    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            return '\0';
        }
        self.source[self.current + 1]
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_numeric(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn keywords() -> HashMap<&'static str, TokenType> {
    HashMap::from([
        ("and", AND),
        ("class", CLASS),
        ("else", ELSE),
        ("false", FALSE),
        ("for", FOR),
        ("foreach", FOREACH),
        ("fun", FUN),
        ("if", IF),
        ("nil", NIL),
        ("or", OR),
        ("print", PRINT),
        ("return", RETURN),
        ("super", SUPER),
        ("this", THIS),
        ("true", TRUE),
        ("var", VAR),
        ("while", WHILE),
    ])
}
