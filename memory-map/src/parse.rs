//! Reader for the `MEMORY` command of a GNU ld script (`memory.x`).
//!
//! Only the `MEMORY` block is interpreted. Other top-level commands are
//! skipped: assignments up to their `;`, `NAME(...)` calls, `NAME { ... }`
//! blocks, and the single-argument `INCLUDE`-style commands.

use alloc::string::String;
use core::fmt;

use crate::map::MemoryMap;
use crate::region::{MemoryRegion, ATTRIBUTE_CHARS};
use crate::size::parse_number;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    Unexpected { expected: &'static str, found: String },
    UnexpectedEof { expected: &'static str },
    InvalidNumber(String),
    Overflow,
    InvalidAttribute(char),
    UnterminatedComment,
    UndefinedRegion(String),
    MissingMemoryBlock,
    RepeatedMemoryBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Unexpected { expected, found } => {
                write!(f, "expected {}, found `{}`", expected, found)
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "expected {}, found end of input", expected)
            }
            ParseErrorKind::InvalidNumber(literal) => write!(f, "invalid number `{}`", literal),
            ParseErrorKind::Overflow => write!(f, "value does not fit in 32 bits"),
            ParseErrorKind::InvalidAttribute(c) => write!(f, "invalid region attribute `{}`", c),
            ParseErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
            ParseErrorKind::UndefinedRegion(name) => {
                write!(f, "region `{}` is used before it is declared", name)
            }
            ParseErrorKind::MissingMemoryBlock => write!(f, "no MEMORY block"),
            ParseErrorKind::RepeatedMemoryBlock => write!(f, "more than one MEMORY block"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{}: {}", self.line, self.column, self.kind)
    }
}

impl core::error::Error for ParseError {}

/// Parses linker script text into a map of the regions its `MEMORY` block declares.
pub fn parse(text: &str) -> Result<MemoryMap, ParseError> {
    let mut cursor = Cursor::new(text);
    let mut map: Option<MemoryMap> = None;

    loop {
        cursor.skip_trivia()?;
        if cursor.peek().is_none() {
            break;
        }
        let (line, column) = (cursor.line, cursor.column);
        let word = cursor.word("a command")?;
        if word == "MEMORY" {
            if map.is_some() {
                return Err(ParseError { line, column, kind: ParseErrorKind::RepeatedMemoryBlock });
            }
            map = Some(cursor.memory_block()?);
        } else {
            cursor.skip_command(&word)?;
        }
    }

    map.ok_or(ParseError {
        line: cursor.line,
        column: cursor.column,
        kind: ParseErrorKind::MissingMemoryBlock,
    })
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$')
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0, line: 1, column: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError { line: self.line, column: self.column, kind }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(c) => self.error(ParseErrorKind::Unexpected { expected, found: c.into() }),
            None => self.error(ParseErrorKind::UnexpectedEof { expected }),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.src[self.pos..].starts_with("/*") => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        if self.src[self.pos..].starts_with("*/") {
                            self.bump();
                            self.bump();
                            break;
                        }
                        if self.bump().is_none() {
                            return Err(ParseError {
                                line,
                                column,
                                kind: ParseErrorKind::UnterminatedComment,
                            });
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn eat(&mut self, expected: char) -> Result<bool, ParseError> {
        self.skip_trivia()?;
        if self.peek() == Some(expected) {
            self.bump();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: char, what: &'static str) -> Result<(), ParseError> {
        if self.eat(expected)? {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn word(&mut self, what: &'static str) -> Result<String, ParseError> {
        self.skip_trivia()?;
        let start = self.pos;
        while self.peek().map_or(false, is_word_char) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.unexpected(what));
        }
        Ok(self.src[start..self.pos].into())
    }

    // A bare file or directory name, which may contain `/` and `-`.
    fn argument(&mut self) -> Result<(), ParseError> {
        self.skip_trivia()?;
        let start = self.pos;
        while self.peek().map_or(false, |c| !c.is_whitespace() && c != ';') {
            self.bump();
        }
        if start == self.pos {
            return Err(self.unexpected("an argument"));
        }
        Ok(())
    }

    fn keyword(&mut self, accepted: &[&str], what: &'static str) -> Result<(), ParseError> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);
        let word = self.word(what)?;
        if accepted.contains(&word.as_str()) {
            Ok(())
        } else {
            Err(ParseError {
                line,
                column,
                kind: ParseErrorKind::Unexpected { expected: what, found: word },
            })
        }
    }

    fn memory_block(&mut self) -> Result<MemoryMap, ParseError> {
        self.expect('{', "`{` after MEMORY")?;
        let mut map = MemoryMap::new();
        loop {
            if self.eat('}')? {
                return Ok(map);
            }
            let region = self.region(&map)?;
            map.push(region);
        }
    }

    // NAME [(ATTR)] : ORIGIN = expr [,] LENGTH = expr [,]
    fn region(&mut self, map: &MemoryMap) -> Result<MemoryRegion, ParseError> {
        let name = self.word("a region name or `}`")?;
        let attributes = if self.eat('(')? { Some(self.attributes()?) } else { None };

        self.expect(':', "`:` after the region name")?;
        self.keyword(&["ORIGIN", "org", "o"], "ORIGIN")?;
        self.expect('=', "`=` after ORIGIN")?;
        let origin = self.expression(map)?;
        self.eat(',')?;
        self.keyword(&["LENGTH", "len", "l"], "LENGTH")?;
        self.expect('=', "`=` after LENGTH")?;
        let length = self.expression(map)?;
        self.eat(',')?;

        Ok(MemoryRegion { name, origin, length, attributes })
    }

    fn attributes(&mut self) -> Result<String, ParseError> {
        let mut attributes = String::new();
        loop {
            match self.peek() {
                Some(')') => {
                    self.bump();
                    return Ok(attributes);
                }
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some(c) if ATTRIBUTE_CHARS.contains(&c) => {
                    attributes.push(c);
                    self.bump();
                }
                Some(c) => return Err(self.error(ParseErrorKind::InvalidAttribute(c))),
                None => return Err(self.unexpected("`)` closing the attributes")),
            }
        }
    }

    // term { + term }
    fn expression(&mut self, map: &MemoryMap) -> Result<u32, ParseError> {
        let (line, column) = (self.line, self.column);
        let mut total = self.term(map)?;
        while self.eat('+')? {
            total = total
                .checked_add(self.term(map)?)
                .ok_or(ParseError { line, column, kind: ParseErrorKind::Overflow })?;
        }
        u32::try_from(total).map_err(|_| ParseError { line, column, kind: ParseErrorKind::Overflow })
    }

    // literal | ORIGIN(NAME) | LENGTH(NAME)
    fn term(&mut self, map: &MemoryMap) -> Result<u64, ParseError> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);
        let word = self.word("a number")?;

        if word == "ORIGIN" || word == "LENGTH" {
            self.expect('(', "`(`")?;
            let name = self.word("a region name")?;
            self.expect(')', "`)`")?;
            let region = map.get(&name).ok_or(ParseError {
                line,
                column,
                kind: ParseErrorKind::UndefinedRegion(name.clone()),
            })?;
            let value = if word == "ORIGIN" { region.origin } else { region.length };
            return Ok(value as u64);
        }

        if !word.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseError {
                line,
                column,
                kind: ParseErrorKind::Unexpected { expected: "a number", found: word },
            });
        }
        parse_number(&word).ok_or(ParseError { line, column, kind: ParseErrorKind::InvalidNumber(word) })
    }

    fn skip_command(&mut self, command: &str) -> Result<(), ParseError> {
        if matches!(command, "INCLUDE" | "INCLUDE_OPTIONAL" | "SEARCH_DIR" | "OUTPUT_ARCH") {
            if self.eat('(')? {
                self.skip_group('(', ')')?;
            } else {
                self.argument()?;
            }
            self.eat(';')?;
            return Ok(());
        }
        if self.eat('(')? {
            self.skip_group('(', ')')?;
            self.eat(';')?;
            return Ok(());
        }
        if self.eat('{')? {
            return self.skip_group('{', '}');
        }
        // assignment such as `_stack_start = ORIGIN(RAM) + LENGTH(RAM);`
        loop {
            self.skip_trivia()?;
            match self.bump() {
                Some(';') => return Ok(()),
                Some(_) => {}
                None => return Err(self.unexpected("`;`")),
            }
        }
    }

    // Consumes up to and including the bracket closing an already opened group.
    fn skip_group(&mut self, open: char, close: char) -> Result<(), ParseError> {
        let mut depth = 1usize;
        loop {
            self.skip_trivia()?;
            match self.bump() {
                Some(c) if c == open => depth += 1,
                Some(c) if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(self.unexpected("a closing bracket")),
            }
        }
    }
}
