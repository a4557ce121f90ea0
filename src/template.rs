//! Tokenizer for templates of literal text and delimited code fragments.
//!
//! ```text
//! Have a `ri(1,100)`(chance)% chance of `chance > 50`
//! ```
//!
//! A code fragment starts with the opening delimiter and runs up to the
//! closing one; fragments do not nest and nothing inside them is escaped.
//! A binding block such as `(chance)` directly after the closing delimiter
//! names the fragment. Literal text runs up to the next opening delimiter,
//! and the escape character includes whatever follows it verbatim.

use std::str::FromStr;

use tracing::debug;

use crate::composition::{CodeFragment, Composition, Token};
use crate::error::{Result, TesseraError};
use crate::scanner::Scanner;

/// The characters a template is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub code_open: char,
    pub code_close: char,
    pub escape: char,
    pub binding_open: char,
    pub binding_close: char,
}

impl Grammar {
    pub const CODE_OPEN: char = '`';
    pub const CODE_CLOSE: char = '`';
    pub const ESCAPE: char = '\\';
    pub const BINDING_OPEN: char = '(';
    pub const BINDING_CLOSE: char = ')';
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            code_open: Self::CODE_OPEN,
            code_close: Self::CODE_CLOSE,
            escape: Self::ESCAPE,
            binding_open: Self::BINDING_OPEN,
            binding_close: Self::BINDING_CLOSE,
        }
    }
}

pub struct Tokenizer {
    scanner: Scanner,
    grammar: Grammar,
}

impl Tokenizer {
    pub fn new(source: &str) -> Result<Self> {
        Self::with_grammar(source, Grammar::default())
    }
    pub fn with_grammar(source: &str, grammar: Grammar) -> Result<Self> {
        Ok(Self {
            scanner: Scanner::new(source)?,
            grammar,
        })
    }
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Reads tokens until the source is exhausted.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while !self.scanner.at_end() {
            tokens.push(self.read_next()?);
        }
        debug!(tokens = tokens.len(), chars = self.scanner.len(), "tokenized template");
        Ok(tokens)
    }
    pub fn compose(self) -> Result<Composition> {
        let grammar = self.grammar;
        let composition: Composition = self.tokenize()?.into_iter().collect();
        Ok(composition.with_grammar(grammar))
    }

    /// Reads a code fragment when the opening delimiter comes next and a literal otherwise.
    pub fn read_next(&mut self) -> Result<Token> {
        if self.scanner.expect(self.grammar.code_open, true)?.is_some() {
            Ok(Token::Code(self.read_code_fragment()?))
        } else {
            self.read_literal()
        }
    }

    pub fn read_literal(&mut self) -> Result<Token> {
        let mut text = String::new();
        while let Some(c) = self.scanner.peek() {
            if c == self.grammar.code_open {
                break;
            }
            self.scanner.read()?;
            if c == self.grammar.escape {
                text.push(self.scanner.read()?);
            } else {
                text.push(c);
            }
        }
        Ok(Token::Literal(text))
    }

    /// Reads the rest of a fragment whose opening delimiter was already consumed.
    pub fn read_code_fragment(&mut self) -> Result<CodeFragment> {
        let close = self.grammar.code_close;
        let code = self.scanner.read_until_any(&[close]);
        self.scanner.expect(close, false)?;
        let mut binding = None;
        if self.scanner.expect(self.grammar.binding_open, true)?.is_some() {
            let binding_close = self.grammar.binding_close;
            binding = Some(self.scanner.read_until_any(&[binding_close]));
            self.scanner.expect(binding_close, false)?;
        }
        Ok(CodeFragment::new(binding, code))
    }
}

/// Tokenizes `source` with the default grammar.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Tokenizer::new(source)?.tokenize()
}

impl FromStr for Composition {
    type Err = TesseraError;

    fn from_str(source: &str) -> Result<Self> {
        Tokenizer::new(source)?.compose()
    }
}
