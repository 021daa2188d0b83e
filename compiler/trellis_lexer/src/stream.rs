//! Tokenizing from `std::io::Read`.
//!
//! Bytes are read in fixed-size chunks and decoded as UTF-8. A multi-byte
//! sequence split across two reads is carried over to the next chunk, so
//! the token stream is the same as tokenizing the whole input at once.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read};

use trellis_grammar::Token;
use trellis_lexer_core::Scanner;

const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Iterator over the tokens of a byte stream.
///
/// Yields `Err` once for an I/O failure or invalid UTF-8 and then stops.
pub struct ReadTokens<R> {
    reader: R,
    scanner: Scanner,
    buf: Vec<u8>,
    /// Undecoded tail of the previous read.
    carry: Vec<u8>,
    ready: VecDeque<Token>,
    done: bool,
}

impl<R: Read> ReadTokens<R> {
    pub fn new(mut scanner: Scanner, reader: R) -> Self {
        scanner.reset(0);
        ReadTokens {
            reader,
            scanner,
            buf: vec![0; DEFAULT_CHUNK_SIZE],
            carry: Vec::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    /// Read at most `size` bytes per call to the underlying reader.
    #[must_use]
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.buf.resize(size.max(1), 0);
        self
    }

    /// Read one chunk and scan it. Returns `false` at end of input.
    fn fill(&mut self) -> io::Result<bool> {
        let read = loop {
            match self.reader.read(&mut self.buf) {
                Ok(read) => break read,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        };

        if read == 0 {
            if !self.carry.is_empty() {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    "stream ended inside a UTF-8 sequence",
                ));
            }
            let ready = &mut self.ready;
            self.scanner.flush(|token| ready.push_back(token));
            return Ok(false);
        }

        self.carry.extend_from_slice(&self.buf[..read]);
        let valid = match std::str::from_utf8(&self.carry) {
            Ok(text) => text.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(err) => return Err(io::Error::new(ErrorKind::InvalidData, err)),
        };
        // `valid` is a char boundary reported by the decoder.
        let text = std::str::from_utf8(&self.carry[..valid])
            .map_err(|err| io::Error::new(ErrorKind::InvalidData, err))?;
        let ready = &mut self.ready;
        self.scanner.consume(text, |token| ready.push_back(token));
        self.carry.drain(..valid);
        tracing::trace!(read, carried = self.carry.len(), "chunk scanned");
        Ok(true)
    }
}

impl<R: Read> Iterator for ReadTokens<R> {
    type Item = io::Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.ready.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }
            match self.fill() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(err) => {
                    self.done = true;
                    self.ready.clear();
                    return Some(Err(err));
                }
            }
        }
    }
}
