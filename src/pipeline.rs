//! Source ingestion driver.
//!
//! For every configured source: fetch the body, pick the parser for its
//! format and feed each domain into the zone writer. Per-source
//! configuration problems skip that source; everything else aborts the run.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crate::config::BlocklistSource;
use crate::fetch::Fetch;
use crate::parser::DomainParser;
use crate::rpz::ZoneWriter;
use crate::{Domain, Error, Result};

/// Counters for a single source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    /// Domains written for the first time
    pub accepted: usize,
    /// Domains already written by this or an earlier source
    pub duplicates: usize,
}

/// Counters for a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Sources drained to completion
    pub processed: usize,
    /// Sources skipped because of a configuration-class error
    pub skipped: usize,
    pub accepted: usize,
    pub duplicates: usize,
}

impl RunStats {
    /// Fold one source outcome in, returning fatal errors.
    fn record(&mut self, source: &BlocklistSource, outcome: Result<SourceStats>) -> Result<()> {
        match outcome {
            Ok(stats) => {
                log::info!(
                    "{}: {} new hosts, {} duplicates",
                    source.label(),
                    stats.accepted,
                    stats.duplicates
                );
                self.processed += 1;
                self.accepted += stats.accepted;
                self.duplicates += stats.duplicates;
                Ok(())
            }
            Err(e) if !e.is_fatal() => {
                log::warn!("Skipping {}: {}", source.label(), e);
                self.skipped += 1;
                Ok(())
            }
            Err(e) => {
                log::error!("Aborting on {}: {}", source.label(), e);
                Err(e)
            }
        }
    }
}

/// Drain a parser into `writer`.
pub fn ingest<R, W>(parser: DomainParser<R>, writer: &mut ZoneWriter<W>) -> Result<SourceStats>
where
    R: std::io::Read,
    W: Write,
{
    drain(parser, |domain| writer.blacklist_host(domain))
}

/// Process all sources in order on the current thread.
pub fn run<F, W>(
    sources: &[BlocklistSource],
    fetcher: &F,
    writer: &mut ZoneWriter<W>,
) -> Result<RunStats>
where
    F: Fetch + ?Sized,
    W: Write,
{
    let mut stats = RunStats::default();
    for source in sources {
        log::info!("Processing {} ({})", source.label(), source.url);
        let outcome = process_source(source, fetcher, |domain| writer.blacklist_host(domain));
        stats.record(source, outcome)?;
    }
    Ok(stats)
}

/// Process sources on up to `jobs` threads sharing one writer.
///
/// Every insertion holds the writer lock, so the duplicate check and the
/// write stay atomic. Records of different sources interleave, so output
/// order is only deterministic with `jobs <= 1`, which falls back to [`run`].
/// After a fatal error no further sources are started.
pub fn run_parallel<F, W>(
    sources: &[BlocklistSource],
    fetcher: &F,
    writer: &mut ZoneWriter<W>,
    jobs: usize,
) -> Result<RunStats>
where
    F: Fetch + Sync + ?Sized,
    W: Write + Send,
{
    if jobs <= 1 || sources.len() <= 1 {
        return run(sources, fetcher, writer);
    }

    let shared = Mutex::new(writer);
    let stats = Mutex::new(RunStats::default());
    let failure: Mutex<Option<Error>> = Mutex::new(None);
    let next = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..jobs.min(sources.len()) {
            scope.spawn(|| {
                while !abort.load(Ordering::Acquire) {
                    let Some(source) = sources.get(next.fetch_add(1, Ordering::Relaxed)) else {
                        break;
                    };

                    log::info!("Processing {} ({})", source.label(), source.url);
                    let outcome = process_source(source, fetcher, |domain| {
                        shared.lock().blacklist_host(domain)
                    });

                    if let Err(e) = stats.lock().record(source, outcome) {
                        abort.store(true, Ordering::Release);
                        failure.lock().get_or_insert(e);
                        break;
                    }
                }
            });
        }
    });

    if let Some(e) = failure.into_inner() {
        return Err(e);
    }
    Ok(stats.into_inner())
}

fn process_source<F>(
    source: &BlocklistSource,
    fetcher: &F,
    add: impl FnMut(&Domain) -> Result<bool>,
) -> Result<SourceStats>
where
    F: Fetch + ?Sized,
{
    let body = fetcher.fetch(&source.url)?;
    drain(DomainParser::new(source.parser, body), add)
}

fn drain<I>(domains: I, mut add: impl FnMut(&Domain) -> Result<bool>) -> Result<SourceStats>
where
    I: IntoIterator<Item = Result<Domain>>,
{
    let mut stats = SourceStats::default();
    for domain in domains {
        if add(&domain?)? {
            stats.accepted += 1;
        } else {
            stats.duplicates += 1;
        }
    }
    Ok(stats)
}
