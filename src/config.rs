//! Blocklist source configuration.
//!
//! Sources are listed in a TOML file as an array of `blacklist` tables:
//!
//! ```toml
//! [[blacklist]]
//! url = "https://adaway.org/hosts.txt"
//! reason = "ads"
//! source = "adaway"
//! parser = "ip_skipper"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::parser::ParserKind;
use crate::{Error, Result};

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "bindhole";

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "blacklists.toml";

/// URL schemes a source may use.
pub const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// A validated blocklist source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocklistSource {
    pub url: Url,
    /// Why the list is blocked (ads, tracking, malware...)
    pub reason: String,
    /// Who maintains the list
    pub source: String,
    pub parser: ParserKind,
}

impl BlocklistSource {
    /// Human readable label for log lines.
    pub fn label(&self) -> &str {
        if self.source.is_empty() {
            self.url.as_str()
        } else {
            &self.source
        }
    }
}

/// A source entry as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawBlocklist {
    pub url: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub source: String,
    pub parser: String,
}

impl RawBlocklist {
    fn validate(self) -> Result<BlocklistSource> {
        let url = Url::parse(&self.url).map_err(|source| Error::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(Error::Config(format!(
                "unsupported URL scheme '{}' in {}",
                url.scheme(),
                self.url
            )));
        }
        let parser: ParserKind = self.parser.parse()?;

        Ok(BlocklistSource {
            url,
            reason: self.reason,
            source: self.source,
            parser,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    blacklist: Vec<RawBlocklist>,
}

/// Default config path: `<config dir>/bindhole/blacklists.toml`.
///
/// The config dir comes from [`dirs::config_dir`]. On Linux that is
/// `$XDG_CONFIG_HOME`, or `~/.config` when the variable is unset; older
/// bindhole releases used `$HOME/bindhole/blacklists.toml` in that case, so
/// such a file has to be moved or passed explicitly with `--config`.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Config("could not find config home".to_string()))?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load and validate the sources listed in the config file at `path`.
///
/// Failing to read or parse the file is an error. Individual entries with a
/// bad URL or an unknown parser are logged and skipped.
pub fn load_sources(path: impl AsRef<Path>) -> Result<Vec<BlocklistSource>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("error loading config on path {:?}: {}", path, e))
    })?;
    parse_sources(&content)
}

/// Parse and validate sources from TOML text.
pub fn parse_sources(content: &str) -> Result<Vec<BlocklistSource>> {
    let config: ConfigFile = toml::from_str(content)?;
    Ok(filter_valid(config.blacklist))
}

fn filter_valid(raw: Vec<RawBlocklist>) -> Vec<BlocklistSource> {
    raw.into_iter()
        .filter_map(|entry| match entry.validate() {
            Ok(source) => Some(source),
            Err(e) => {
                log::warn!("{}, skipping.", e);
                None
            }
        })
        .collect()
}
