//! Reading the surface syntax
//!
//! ```text
//! Formula := Clause (AND Clause)*
//! Clause  := '(' Literal (OR Literal)* ')'
//! Literal := [NOT] "name"
//! ```
//!
//! The connectives can be spelled as words (`AND`, `OR`, `NOT`, either case)
//! or symbolically (`/\`, `\/`, `!`).  Whitespace between tokens doesn't
//! matter.
//!
//! This only produces the syntax tree: whether a name is a variable or a
//! stored formula is decided during expansion.

use crate::error::ParseError;
use std::iter::Peekable;

/// One literal as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub negated: bool,
    pub name: String,
    /// Byte offset of the name in the source
    pub offset: usize,
}

/// The literals of one clause, in source order
pub type ClauseSyntax = Vec<Atom>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    Not,
    Name(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Open => "'('".to_owned(),
            Token::Close => "')'".to_owned(),
            Token::And => "AND".to_owned(),
            Token::Or => "OR".to_owned(),
            Token::Not => "NOT".to_owned(),
            Token::Name(name) => format!("name {:?}", name),
        }
    }
}

/// Tokens with their byte offsets
struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn name(&mut self, start: usize) -> Result<Token, ParseError> {
        // skip the opening quote
        let body = &self.src[start + 1..];
        let len = body
            .find('"')
            .ok_or(ParseError::UnterminatedName { offset: start })?;
        self.pos = start + 1 + len + 1;
        let name = body[..len].trim();
        if name.is_empty() {
            return Err(ParseError::EmptyName { offset: start });
        }
        Ok(Token::Name(name.to_owned()))
    }

    fn word(&mut self, start: usize) -> Result<Token, ParseError> {
        let len = self
            .rest()
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or_else(|| self.rest().len());
        let word = &self.src[start..start + len];
        self.pos = start + len;
        match word.to_ascii_uppercase().as_str() {
            "AND" => Ok(Token::And),
            "OR" => Ok(Token::Or),
            "NOT" => Ok(Token::Not),
            _ => Err(ParseError::UnexpectedWord {
                offset: start,
                word: word.to_owned(),
            }),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<(usize, Token), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let skipped = self.rest().len() - self.rest().trim_start().len();
        self.pos += skipped;

        let start = self.pos;
        let ch = self.rest().chars().next()?;
        let token = if self.rest().starts_with("/\\") {
            self.pos += 2;
            Ok(Token::And)
        } else if self.rest().starts_with("\\/") {
            self.pos += 2;
            Ok(Token::Or)
        } else {
            match ch {
                '(' => {
                    self.pos += 1;
                    Ok(Token::Open)
                }
                ')' => {
                    self.pos += 1;
                    Ok(Token::Close)
                }
                '!' => {
                    self.pos += 1;
                    Ok(Token::Not)
                }
                '"' => self.name(start),
                c if c.is_alphabetic() => self.word(start),
                c => {
                    // don't get stuck on it
                    self.pos = self.src.len();
                    Err(ParseError::UnexpectedChar { offset: start, ch: c })
                }
            }
        };
        Some(token.map(|t| (start, t)))
    }
}

struct Parser<'a> {
    tokens: Peekable<Lexer<'a>>,
}

impl Parser<'_> {
    fn next(&mut self, expected: &'static str) -> Result<(usize, Token), ParseError> {
        self.tokens
            .next()
            .unwrap_or(Err(ParseError::UnexpectedEnd { expected }))
    }

    /// Consume the next token if it's `token`
    fn eat(&mut self, token: &Token) -> Result<bool, ParseError> {
        match self.tokens.peek() {
            Some(Ok((_, t))) if t == token => {
                self.tokens.next();
                Ok(true)
            }
            Some(Err(e)) => Err(e.clone()),
            _ => Ok(false),
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), ParseError> {
        match self.next(expected)? {
            (_, t) if t == token => Ok(()),
            (offset, t) => Err(ParseError::UnexpectedToken {
                offset,
                expected,
                found: t.describe(),
            }),
        }
    }

    fn formula(&mut self) -> Result<Vec<ClauseSyntax>, ParseError> {
        if self.tokens.peek().is_none() {
            return Err(ParseError::EmptyInput);
        }
        let mut clauses = vec![self.clause()?];
        while self.eat(&Token::And)? {
            clauses.push(self.clause()?);
        }
        match self.tokens.next() {
            None => Ok(clauses),
            Some(Err(e)) => Err(e),
            Some(Ok((offset, t))) => Err(ParseError::UnexpectedToken {
                offset,
                expected: "AND or end of input",
                found: t.describe(),
            }),
        }
    }

    fn clause(&mut self) -> Result<ClauseSyntax, ParseError> {
        self.expect(Token::Open, "'('")?;
        let mut atoms = vec![self.atom()?];
        while self.eat(&Token::Or)? {
            atoms.push(self.atom()?);
        }
        self.expect(Token::Close, "OR or ')'")?;
        Ok(atoms)
    }

    fn atom(&mut self) -> Result<Atom, ParseError> {
        let negated = self.eat(&Token::Not)?;
        match self.next("a quoted name")? {
            (offset, Token::Name(name)) => Ok(Atom {
                negated,
                name,
                offset,
            }),
            (offset, t) => Err(ParseError::UnexpectedToken {
                offset,
                expected: "a quoted name",
                found: t.describe(),
            }),
        }
    }
}

/// Parse a formula into its clauses of (possibly negated) names
pub fn parse(src: &str) -> Result<Vec<ClauseSyntax>, ParseError> {
    Parser {
        tokens: Lexer::new(src).peekable(),
    }
    .formula()
}

/// Parse pre-assignments, eg. `R := true, S := false`
///
/// Blank input means no pre-assignments.
pub fn parse_assignments(src: &str) -> Result<Vec<(String, bool)>, ParseError> {
    if src.trim().is_empty() {
        return Ok(Vec::new());
    }
    src.split(',')
        .map(|entry| {
            let bad = || ParseError::BadAssignment(entry.trim().to_owned());
            let (name, value) = entry.split_once(":=").ok_or_else(bad)?;
            let name = name.trim().trim_matches('"').trim();
            if name.is_empty() {
                return Err(bad());
            }
            let value = match value.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => return Err(bad()),
            };
            Ok((name.to_owned(), value))
        })
        .collect()
}
