//! Zone script writer.

use ahash::AHashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::format::{self, ZoneOptions, BATCH_SIZE, SEND_DIRECTIVE};
use crate::{Domain, Error, Result};

/// Writes blocked hosts to an RPZ update script, once per domain.
///
/// The preamble is written on construction. Every accepted host becomes an
/// `update add` line; a `send` is inserted before the record that opens each
/// new batch of [`BATCH_SIZE`], and [`close`](Self::close) commits the last
/// batch. A writer that is dropped without being closed is finished on a
/// best-effort basis so the script stays well formed.
pub struct ZoneWriter<W: Write = File> {
    /// Buffered output, `None` once finished
    out: Option<BufWriter<W>>,
    zone: String,
    /// Domains already written
    written: AHashSet<Domain>,
    record_count: usize,
    duplicate_count: usize,
    /// Records written since the last `send`
    unsent: usize,
}

impl ZoneWriter<File> {
    /// Create or truncate the zone script at `path` and write its preamble.
    pub fn create(path: impl AsRef<Path>, options: &ZoneOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Opened zone file {:?}", path);
        Self::new(file, options)
    }
}

impl<W: Write> ZoneWriter<W> {
    /// Wrap `inner` and write the script preamble.
    pub fn new(inner: W, options: &ZoneOptions) -> Result<Self> {
        let mut out = BufWriter::new(inner);
        out.write_all(format::header(options).as_bytes())
            .map_err(|e| Error::write("server initial config", e))?;

        Ok(Self {
            out: Some(out),
            zone: options.zone.clone(),
            written: AHashSet::new(),
            record_count: 0,
            duplicate_count: 0,
            unsent: 0,
        })
    }

    /// Add a blocked host.
    ///
    /// Returns `Ok(false)` without writing anything if the host was already
    /// written. A write failure is returned as-is; the host is not recorded.
    pub fn blacklist_host(&mut self, domain: &Domain) -> Result<bool> {
        if self.written.contains(domain) {
            log::debug!("Host '{}' already in the list, skipping.", domain);
            self.duplicate_count += 1;
            return Ok(false);
        }

        let batch_full = self.unsent == BATCH_SIZE;
        let record = format::add_record(domain, &self.zone);
        let chunk = if batch_full {
            format!("{}{}", SEND_DIRECTIVE, record)
        } else {
            record
        };
        self.write_all(&chunk)
            .map_err(|e| Error::write(format!("host '{}'", domain), e))?;

        if batch_full {
            self.unsent = 0;
        }
        self.unsent += 1;
        self.record_count += 1;
        self.written.insert(domain.clone());
        Ok(true)
    }

    /// Check whether `domain` has already been written.
    pub fn contains(&self, domain: &Domain) -> bool {
        self.written.contains(domain)
    }

    /// Number of unique records written.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Number of duplicate submissions skipped.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_count
    }

    /// Commit the last batch, flush and close the output.
    pub fn close(self) -> Result<()> {
        self.into_inner().map(drop)
    }

    /// Like [`close`](Self::close), but hands back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        match self.finish()? {
            Some(inner) => Ok(inner),
            None => Err(Error::write("final send", closed_error())),
        }
    }

    fn write_all(&mut self, data: &str) -> io::Result<()> {
        match self.out.as_mut() {
            Some(out) => out.write_all(data.as_bytes()),
            None => Err(closed_error()),
        }
    }

    fn finish(&mut self) -> Result<Option<W>> {
        let Some(mut out) = self.out.take() else {
            return Ok(None);
        };

        if self.unsent > 0 {
            out.write_all(SEND_DIRECTIVE.as_bytes())
                .map_err(|e| Error::write("last send", e))?;
            self.unsent = 0;
        }

        out.flush()
            .map_err(|e| Error::write("buffered records", e))?;
        let inner = out
            .into_inner()
            .map_err(|e| Error::write("buffered records", e.into_error()))?;

        log::debug!("Closed zone file with {} records", self.record_count);
        Ok(Some(inner))
    }
}

impl<W: Write> Drop for ZoneWriter<W> {
    fn drop(&mut self) {
        if self.out.is_none() {
            return;
        }
        log::warn!("Zone writer dropped without close, finishing script");
        if let Err(e) = self.finish() {
            log::error!("Could not finish zone file: {}", e);
        }
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "zone writer is closed")
}
