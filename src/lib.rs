//! Bindhole - turn domain blocklists into a DNS response policy zone.
//!
//! This crate downloads blocklists in common text formats, normalizes and
//! deduplicates the domains they contain, and writes an `nsupdate` script
//! that adds one `CNAME .` record per blocked domain to a response policy
//! zone (RPZ). Loaded by a resolver such as BIND, the zone makes every listed
//! name resolve to NXDOMAIN.
//!
//! # Supported formats
//!
//! - **simple**: one domain per line, `#` comment lines
//! - **ip_skipper**: hosts-file lines of the form `0.0.0.0 <domain>`
//!
//! # Quick Start
//!
//! ```ignore
//! use bindhole::{load_sources, pipeline, HttpFetcher, ZoneOptions, ZoneWriter};
//! use std::time::Duration;
//!
//! let sources = load_sources("blacklists.toml")?;
//! let fetcher = HttpFetcher::new(Duration::from_secs(60))?;
//! let mut writer = ZoneWriter::create("bindhole.zone", &ZoneOptions::default())?;
//!
//! let outcome = pipeline::run(&sources, &fetcher, &mut writer);
//! writer.close()?;
//! let stats = outcome?;
//! println!("{} hosts blocked", stats.accepted);
//! ```
//!
//! # Output
//!
//! ```text
//! server 127.0.0.1 53
//! ttl 600
//! zone bindholerpz
//! update add ads.example.com.bindholerpz CNAME .
//! ...
//! send
//! ```
//!
//! A `send` directive commits every batch of ten records.

mod domain;
mod error;

pub mod config;
pub mod fetch;
pub mod parser;
pub mod pipeline;
pub mod rpz;

// Re-export core types
pub use domain::{is_valid_domain, normalize_domain, Domain};
pub use error::{DomainError, Error, Result};

pub use config::{default_config_path, load_sources, BlocklistSource};
pub use fetch::{Fetch, HttpFetcher};
pub use parser::{select_parser, DomainParser, ParserKind};
pub use pipeline::{RunStats, SourceStats};
pub use rpz::{ZoneOptions, ZoneWriter};
