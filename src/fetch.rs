//! Blocklist download.
//!
//! The pipeline only needs a byte stream per source. [`Fetch`] is the seam;
//! [`HttpFetcher`] is the production implementation over a blocking
//! `reqwest` client. Gzip-compressed bodies are detected by their magic
//! bytes and decoded on the fly.

use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::time::Duration;
use url::Url;

use crate::{Error, Result};

/// Byte stream of a fetched blocklist.
pub type Body = Box<dyn Read + Send>;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Something that can turn a source URL into a byte stream.
pub trait Fetch {
    /// Fetch the body behind `url`.
    ///
    /// Only successful responses produce a body. A non-success status is
    /// reported as [`Error::HttpStatus`] so the caller can skip the source.
    fn fetch(&self, url: &Url) -> Result<Body>;
}

/// Fetches `http(s)://` sources with reqwest and `file://` sources from disk.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bindhole/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn fetch_file(&self, url: &Url) -> Result<Body> {
        let path = url
            .to_file_path()
            .map_err(|_| Error::Config(format!("not a local file URL: {}", url)))?;
        let file = File::open(&path)?;
        Ok(decode_body(file)?)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Body> {
        match url.scheme() {
            "file" => return self.fetch_file(url),
            "http" | "https" => {}
            other => {
                return Err(Error::Config(format!(
                    "unsupported URL scheme '{}' in {}",
                    other, url
                )));
            }
        }

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        log::debug!(
            "Fetched {} ({} bytes announced)",
            url,
            response
                .content_length()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        Ok(decode_body(response)?)
    }
}

/// Wrap a raw body, transparently decompressing gzip.
pub fn decode_body<R: Read + Send + 'static>(reader: R) -> io::Result<Body> {
    let mut reader = BufReader::new(reader);
    let is_gzip = {
        let head = reader.fill_buf()?;
        head.len() >= GZIP_MAGIC.len() && head[..GZIP_MAGIC.len()] == GZIP_MAGIC
    };

    if is_gzip {
        log::debug!("Decoding gzip compressed body");
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}
