//! bindhole: build an RPZ update script from remote domain blocklists.

use bindhole::rpz::format::{DEFAULT_PORT, DEFAULT_SERVER, DEFAULT_TTL, DEFAULT_ZONE};
use bindhole::{default_config_path, load_sources, pipeline, HttpFetcher, ZoneOptions, ZoneWriter};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bindhole")]
#[command(version)]
#[command(about = "Generate a DNS response policy zone from domain blocklists", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the output file
    #[arg(short, long, default_value = "./bindhole.zone")]
    output: PathBuf,

    /// DNS server the update script targets
    #[arg(short, long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Port of the DNS server
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Response policy zone name
    #[arg(long, default_value = DEFAULT_ZONE)]
    zone: String,

    /// TTL of the added records, in seconds
    #[arg(long, default_value_t = DEFAULT_TTL)]
    ttl: u32,

    /// Download timeout per blocklist, in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Number of blocklists fetched concurrently
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = generate(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    log::debug!("Reading blocklists from {:?}", config_path);

    let sources = load_sources(&config_path)?;
    if sources.is_empty() {
        log::warn!("No usable blocklists in {:?}", config_path);
    }

    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout))?;
    let options = ZoneOptions::new(cli.server.clone(), cli.port)
        .with_zone(cli.zone.clone())
        .with_ttl(cli.ttl);
    let mut writer = ZoneWriter::create(&cli.output, &options)?;

    let outcome = pipeline::run_parallel(&sources, &fetcher, &mut writer, cli.jobs);
    let records = writer.record_count();
    // Close on every path so a failed run still leaves a well-formed script.
    let closed = writer.close();

    let stats = outcome?;
    closed?;

    log::info!(
        "Wrote {} hosts to {:?} ({} sources, {} skipped, {} duplicates)",
        records,
        cli.output,
        stats.processed,
        stats.skipped,
        stats.duplicates
    );
    Ok(())
}
