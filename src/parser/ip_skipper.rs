//! Hosts-file format (`0.0.0.0 <domain>`).

use std::io::Read;

use super::LineReader;
use crate::domain::normalize_domain;
use crate::{Domain, Result};

const BLOCK_PREFIX: &str = "0.0.0.0 ";

/// Targets that hosts files map to themselves; never blocked.
const RESERVED_HOSTS: [&str; 5] = ["127.0.0.1", "255.255.255.255", "::1", "localhost", "0.0.0.0"];

/// Parser for hosts-file lists that sink entries to `0.0.0.0`.
///
/// Only `0.0.0.0 <host>` lines are considered. Anything after the host
/// (aliases, trailing comments) is ignored.
pub struct IpSkipperParser<R> {
    lines: LineReader<R>,
}

impl<R: Read> IpSkipperParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }
}

impl<R: Read> Iterator for IpSkipperParser<R> {
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

/// Extract the blocked host from a single hosts-file line.
pub(crate) fn parse_line(line: &str) -> Option<Domain> {
    let rest = line.trim().strip_prefix(BLOCK_PREFIX)?;
    if rest.is_empty() {
        return None;
    }

    let host = rest.split(' ').next().unwrap_or(rest);
    if RESERVED_HOSTS.contains(&host) {
        return None;
    }

    let domain = normalize_domain(host);
    if domain.is_none() {
        log::warn!("Invalid domain: {}", host);
    }
    domain
}
