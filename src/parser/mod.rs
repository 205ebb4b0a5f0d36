//! Blocklist format parsers.
//!
//! Each parser wraps a byte stream and yields one normalized [`Domain`] per
//! accepted line. End of stream ends the iterator; any other read failure is
//! yielded once as an error, after which the parser is exhausted.

mod ip_skipper;
mod simple;

pub use ip_skipper::IpSkipperParser;
pub use simple::SimpleParser;

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::str::FromStr;

use crate::{Domain, Error, Result};

/// Supported blocklist formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserKind {
    /// One domain per line, `#` comments.
    Simple,
    /// Hosts-file style, `0.0.0.0 <domain>` entries.
    IpSkipper,
}

impl ParserKind {
    /// Get the configuration name of this parser kind.
    pub fn name(&self) -> &'static str {
        match self {
            ParserKind::Simple => "simple",
            ParserKind::IpSkipper => "ip_skipper",
        }
    }
}

impl FromStr for ParserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "simple" => Ok(ParserKind::Simple),
            "ip_skipper" => Ok(ParserKind::IpSkipper),
            other => Err(Error::UnsupportedParser(other.to_string())),
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parser for any supported format.
pub enum DomainParser<R> {
    Simple(SimpleParser<R>),
    IpSkipper(IpSkipperParser<R>),
}

impl<R: Read> DomainParser<R> {
    pub fn new(kind: ParserKind, reader: R) -> Self {
        match kind {
            ParserKind::Simple => DomainParser::Simple(SimpleParser::new(reader)),
            ParserKind::IpSkipper => DomainParser::IpSkipper(IpSkipperParser::new(reader)),
        }
    }

    pub fn kind(&self) -> ParserKind {
        match self {
            DomainParser::Simple(_) => ParserKind::Simple,
            DomainParser::IpSkipper(_) => ParserKind::IpSkipper,
        }
    }
}

impl<R: Read> Iterator for DomainParser<R> {
    type Item = Result<Domain>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            DomainParser::Simple(p) => p.next(),
            DomainParser::IpSkipper(p) => p.next(),
        }
    }
}

/// Select a parser by its configuration name.
///
/// Unknown names return [`Error::UnsupportedParser`]; callers skip the source.
pub fn select_parser<R: Read>(kind: &str, reader: R) -> Result<DomainParser<R>> {
    let kind: ParserKind = kind.parse()?;
    Ok(DomainParser::new(kind, reader))
}

/// Newline-delimited line source shared by the parsers.
///
/// Lines are decoded lossily: blocklists sometimes carry Latin-1 comments,
/// and any line with replacement characters fails domain validation anyway.
pub(crate) struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> LineReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            buf: Vec::with_capacity(256),
            done: false,
        }
    }

    /// Read the next line without its terminator.
    ///
    /// A final line without a trailing newline is still returned. Returns
    /// `None` at end of stream and after the first error.
    pub(crate) fn next_line(&mut self) -> Option<io::Result<String>> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.inner.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => {
                // Bytes of a severed line are dropped with the buffer.
                self.done = true;
                self.buf.clear();
                Some(Err(e))
            }
        }
    }
}
