//! Line-splitting and chunked-I/O glue in front of [`Parser`]. The parser
//! only knows how to consume one line at a time; this module turns a byte
//! slice or a file into that sequence of lines, buffering a partial line
//! across chunk boundaries so the chunk size used to read a file never
//! affects the tokens the lexer sees.

use std::io::Read;
use std::path::Path;

use crate::dom::DomTree;
use crate::error::ParseError;
use crate::parser::Parser;

/// Default chunk size for [`read_file_chunked`], one byte short of the
/// classic 4096-byte page so a null terminator can be appended without a
/// reallocation in implementations that need one; this implementation
/// doesn't, but the bound is kept for parity with the source.
pub const CHUNK_SIZE: usize = 4095;

/// Splits fed bytes on `\n` and hands each complete line to a [`Parser`],
/// dropping lines that are empty the instant they're split out — a blank
/// line contributes nothing and is not itself a parse error. A line with no
/// trailing newline is buffered until more input arrives or `finish` flushes
/// it.
pub struct Driver {
    parser: Parser,
    pending: Vec<u8>,
}

impl Driver {
    pub fn new() -> Self {
        Driver { parser: Parser::new(), pending: Vec::new() }
    }

    /// Feeds another chunk of input, in file order. May be called any
    /// number of times before `finish`.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ParseError> {
        self.pending.extend_from_slice(chunk);

        let mut start = 0usize;
        while let Some(rel) = memchr::memchr(b'\n', &self.pending[start..]) {
            let end = start + rel;
            if end > start {
                self.parser.feed_line(&self.pending[start..end])?;
            }
            start = end + 1;
        }
        self.pending.drain(..start);
        Ok(())
    }

    /// Flushes any unterminated trailing line and runs the terminal check.
    pub fn finish(mut self) -> Result<DomTree, ParseError> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.parser.feed_line(&line)?;
        }
        self.parser.finish()
    }
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new()
    }
}

/// Parses a complete in-memory document.
pub fn parse_bytes(data: &[u8]) -> Result<DomTree, ParseError> {
    let mut driver = Driver::new();
    driver.feed(data)?;
    driver.finish()
}

/// Reads `path` in bounded chunks of at most `CHUNK_SIZE` bytes, invoking
/// `callback` once per chunk in file order. Mirrors the source's
/// `readstream(buffer, path, buflen, callback)` contract: the callback is
/// expected to fully consume its chunk before returning, which `Driver::feed`
/// does by copying it into the pending-line buffer.
pub fn read_file_chunked(path: &Path, mut callback: impl FnMut(&[u8]) -> Result<(), ParseError>) -> Result<(), ParseError> {
    let mut file = std::fs::File::open(path)
        .map_err(|err| ParseError::io("read_file_chunked", format!("{}: {err}", path.display())))?;
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|err| ParseError::io("read_file_chunked", format!("{}: {err}", path.display())))?;
        if n == 0 {
            break;
        }
        callback(&buf[..n])?;
    }
    Ok(())
}

/// Parses a document read from disk in `CHUNK_SIZE`-bounded chunks. Parser
/// state persists across chunks; the terminal check runs once, after the
/// last chunk is read.
pub fn parse_file(path: impl AsRef<Path>) -> Result<DomTree, ParseError> {
    let path = path.as_ref();
    let mut driver = Driver::new();
    read_file_chunked(path, |chunk| driver.feed(chunk))?;
    driver.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bytes_handles_multiple_lines() {
        let tree = parse_bytes(b"<!DOCTYPE html>\n<html>\n  <head></head>\n  <body></body>\n</html>\n").unwrap();
        assert_eq!(tree.doctype, b"DOCTYPE html");
        let root = tree.root.unwrap();
        assert_eq!(root.borrow().children.len(), 2);
    }

    #[test]
    fn blank_lines_inside_the_document_are_dropped() {
        let tree = parse_bytes(b"<html>\n\n\n</html>\n").unwrap();
        let root = tree.root.unwrap();
        assert_eq!(root.borrow().name, b"html");
        assert!(root.borrow().body.is_empty());
    }

    #[test]
    fn an_unclosed_document_is_a_structure_error() {
        let err = parse_bytes(b"<a>\n").unwrap_err();
        assert!(matches!(err, ParseError::Structure { .. }));
    }

    #[test]
    fn feed_can_split_a_document_at_arbitrary_chunk_boundaries() {
        let input: &[u8] = b"<!DOCTYPE html>\n<p>hello world</p>\n";
        for split_at in 0..input.len() {
            let mut driver = Driver::new();
            driver.feed(&input[..split_at]).unwrap();
            driver.feed(&input[split_at..]).unwrap();
            let tree = driver.finish().unwrap();
            assert_eq!(tree.root.unwrap().borrow().body, b"hello world");
        }
    }
}
