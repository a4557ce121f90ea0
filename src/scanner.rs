//! Character cursor used by the template tokenizer.
//!
//! A [`Scanner`] walks an immutable, non-empty source one character at a time.
//! Higher level grammar is expressed through a handful of primitives: reading,
//! peeking, seeking and *expectations*, which either consume a character from
//! an accepted set or report what was found instead. Optional expectations
//! never move the cursor when they fail, which is what makes backtracking a
//! local property of the grammar.

// used to lazily cache the line/column of the current position
use std::cell::Cell;
// the same origins as for any other seekable stream
use std::io::SeekFrom;

use crate::error::{Result, TesseraError};

const NEW_LINE: char = '\n';

/// Line (1-based) and column (0-based) of a scanner position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    source: Vec<char>,
    position: usize,
    location: Cell<Option<Location>>,
}

impl Scanner {
    /// Creates a scanner positioned at the start of `source`.
    /// An empty source is rejected with [`TesseraError::InvalidSource`].
    pub fn new(source: &str) -> Result<Self> {
        if source.is_empty() {
            return Err(TesseraError::InvalidSource(
                "source must contain at least one character".into(),
            ));
        }
        Ok(Self {
            source: source.chars().collect(),
            position: 0,
            location: Cell::new(None),
        })
    }
    pub fn position(&self) -> usize {
        self.position
    }
    pub fn len(&self) -> usize {
        self.source.len()
    }
    /// Always `false` since [`Scanner::new`] rejects empty sources; pairs with `len`.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
    pub fn at_end(&self) -> bool {
        self.position >= self.source.len()
    }
    pub fn source(&self) -> String {
        self.source.iter().collect()
    }
    /// Everything before the current position.
    pub fn consumed(&self) -> String {
        self.source[..self.position].iter().collect()
    }
    /// Location of the current position, counted from the newlines consumed so far.
    pub fn location(&self) -> Location {
        if let Some(location) = self.location.get() {
            return location;
        }
        let consumed = &self.source[..self.position];
        let line = consumed.iter().filter(|c| **c == NEW_LINE).count() + 1;
        let column = match consumed.iter().rposition(|c| *c == NEW_LINE) {
            Some(newline) => self.position - newline - 1,
            None => self.position,
        };
        let location = Location { line, column };
        self.location.set(Some(location));
        location
    }

    // Every change of position goes through here so the cached location never goes stale.
    fn move_to(&mut self, position: usize) {
        self.position = position;
        self.location.set(None);
    }

    pub fn peek(&self) -> Option<char> {
        self.source.get(self.position).copied()
    }
    /// Returns the current character and consumes it.
    pub fn read(&mut self) -> Result<char> {
        let c = self.peek().ok_or(TesseraError::UnexpectedEndOfInput {
            length: self.source.len(),
        })?;
        self.move_to(self.position + 1);
        Ok(c)
    }
    /// Repositions the cursor and returns the new position. A target outside
    /// `0..=len` fails with [`TesseraError::OutOfRange`] and leaves the
    /// position untouched. Offsets follow [`SeekFrom`], so `End(-1)` is the
    /// last character and positive `End` offsets are always out of range.
    pub fn seek(&mut self, target: SeekFrom) -> Result<usize> {
        let length = self.source.len();
        let position = match target {
            SeekFrom::Start(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
            SeekFrom::Current(offset) => (self.position as i64).saturating_add(offset),
            SeekFrom::End(offset) => (length as i64).saturating_add(offset),
        };
        if position < 0 || position > length as i64 {
            return Err(TesseraError::OutOfRange { position, length });
        }
        self.move_to(position as usize);
        Ok(self.position)
    }
    /// Moves the cursor `amount` characters backwards.
    pub fn back(&mut self, amount: usize) -> Result<usize> {
        let offset = i64::try_from(amount).map(|a| -a).unwrap_or(i64::MIN);
        self.seek(SeekFrom::Current(offset))
    }

    /// Consumes characters for as long as `predicate(consumed_so_far, next)`
    /// holds. The first character failing the predicate is left in place.
    pub fn read_while<P>(&mut self, mut predicate: P) -> String
    where
        P: FnMut(&str, char) -> bool,
    {
        let mut parsed = String::new();
        while let Some(c) = self.peek() {
            if !predicate(&parsed, c) {
                break;
            }
            self.move_to(self.position + 1);
            parsed.push(c);
        }
        parsed
    }
    pub fn read_while_char<P>(&mut self, mut predicate: P) -> String
    where
        P: FnMut(char) -> bool,
    {
        self.read_while(|_, c| predicate(c))
    }
    pub fn skip_whitespace(&mut self) -> String {
        self.read_while_char(char::is_whitespace)
    }
    pub fn read_until_whitespace(&mut self) -> String {
        self.read_while_char(|c| !c.is_whitespace())
    }
    pub fn read_until_any(&mut self, stops: &[char]) -> String {
        self.read_while_char(|c| !stops.contains(&c))
    }
    pub fn read_until_whitespace_or_any(&mut self, stops: &[char]) -> String {
        self.read_while_char(|c| !(c.is_whitespace() || stops.contains(&c)))
    }

    /// Consumes `expected` if it is the current character. When it is not,
    /// an optional expectation yields `None` while a mandatory one fails.
    pub fn expect(&mut self, expected: char, optional: bool) -> Result<Option<char>> {
        self.expect_any(&[expected], optional)
    }
    pub fn expect_any(&mut self, expected: &[char], optional: bool) -> Result<Option<char>> {
        match self.peek() {
            Some(c) if expected.contains(&c) => {
                self.move_to(self.position + 1);
                Ok(Some(c))
            }
            _ if optional => Ok(None),
            Some(found) => {
                let Location { line, column } = self.location();
                Err(TesseraError::UnexpectedCharacter { found, line, column })
            }
            None => Err(TesseraError::UnexpectedEndOfInput {
                length: self.source.len(),
            }),
        }
    }
    /// Matches `expected` as a whole or not at all: on any mismatch the cursor
    /// returns to where it started.
    pub fn expect_sequence(&mut self, expected: &str, optional: bool) -> Result<bool> {
        let start = self.position;
        for c in expected.chars() {
            match self.expect(c, optional) {
                Ok(Some(_)) => (),
                Ok(None) => {
                    self.move_to(start);
                    return Ok(false);
                }
                Err(e) => {
                    self.move_to(start);
                    return Err(e);
                }
            }
        }
        Ok(true)
    }
}
