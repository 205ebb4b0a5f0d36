//! RPZ update-script directives.
//!
//! The output is an `nsupdate` script:
//!
//! ```text
//! server <server> <port>
//! ttl <ttl>
//! zone <zone>
//! update add <domain>.<zone> CNAME .
//! ...
//! send
//! ```
//!
//! A `CNAME .` record in a response policy zone makes the resolver answer
//! NXDOMAIN for the name.

use crate::Domain;

/// Number of records per `send` batch.
pub const BATCH_SIZE: usize = 10;

/// Default zone name.
pub const DEFAULT_ZONE: &str = "bindholerpz";

/// Default record TTL in seconds.
pub const DEFAULT_TTL: u32 = 600;

/// Default DNS server receiving the updates.
pub const DEFAULT_SERVER: &str = "127.0.0.1";

/// Default DNS server port.
pub const DEFAULT_PORT: u16 = 53;

/// Batch commit directive.
pub const SEND_DIRECTIVE: &str = "send\n";

/// Settings for the zone script preamble and record names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOptions {
    /// DNS server the script is sent to
    pub server: String,
    /// Port of the DNS server
    pub port: u16,
    /// Response policy zone name
    pub zone: String,
    /// TTL applied to added records
    pub ttl: u32,
}

impl ZoneOptions {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for ZoneOptions {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            zone: DEFAULT_ZONE.to_string(),
            ttl: DEFAULT_TTL,
        }
    }
}

/// Format the script preamble.
pub fn header(options: &ZoneOptions) -> String {
    format!(
        "server {} {}\nttl {}\nzone {}\n",
        options.server, options.port, options.ttl, options.zone
    )
}

/// Format the directive blocking `domain` inside `zone`.
pub fn add_record(domain: &Domain, zone: &str) -> String {
    format!("update add {}.{} CNAME .\n", domain, zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        assert_eq!(
            header(&ZoneOptions::default()),
            "server 127.0.0.1 53\nttl 600\nzone bindholerpz\n"
        );
    }

    #[test]
    fn test_custom_header() {
        let options = ZoneOptions::new("10.0.0.2", 5353)
            .with_zone("rpz.local")
            .with_ttl(300);
        assert_eq!(
            header(&options),
            "server 10.0.0.2 5353\nttl 300\nzone rpz.local\n"
        );
    }

    #[test]
    fn test_add_record() {
        let domain: Domain = "ck.getcookiestxt.com".parse().unwrap();
        assert_eq!(
            add_record(&domain, DEFAULT_ZONE),
            "update add ck.getcookiestxt.com.bindholerpz CNAME .\n"
        );
    }
}
