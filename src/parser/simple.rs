//! Plain domain-per-line format.

use std::io::Read;

use super::LineReader;
use crate::domain::normalize_domain;
use crate::{Domain, Result};

const COMMENT_PREFIX: &str = "#";

/// Parser for lists with one domain per line and `#` comment lines.
pub struct SimpleParser<R> {
    lines: LineReader<R>,
}

impl<R: Read> SimpleParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }
}

impl<R: Read> Iterator for SimpleParser<R> {
    type Item = Result<Domain>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next_line()? {
                Ok(line) => {
                    if let Some(domain) = parse_line(&line) {
                        return Some(Ok(domain));
                    }
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Extract the domain from a single plain-list line.
pub(crate) fn parse_line(line: &str) -> Option<Domain> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return None;
    }

    let domain = normalize_domain(line);
    if domain.is_none() {
        log::warn!("Invalid domain: {}", line);
    }
    domain
}
