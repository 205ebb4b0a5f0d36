//! End-to-end tests: config file, local blocklists, zone script.

use bindhole::fetch::DEFAULT_TIMEOUT;
use bindhole::{
    is_valid_domain, load_sources, pipeline, HttpFetcher, ParserKind, ZoneOptions, ZoneWriter,
};
use std::fs;
use std::path::Path;
use url::Url;

const PLAIN_LIST: &str = "# Easylist mirror
0008d6ba2e.com
0024ad98dd.com
Shared.Example.com.
this is not a domain
";

const HOSTS_LIST: &str = "127.0.0.1 localhost
::1 localhost
0.0.0.0 0.0.0.0
0.0.0.0 ck.getcookiestxt.com
0.0.0.0 ck.getcookiestxt.com
0.0.0.0 shared.example.com # seen in the plain list too
0.0.0.0 wizhumpgyros.com";

fn write_config(dir: &Path, entries: &[(&str, &str)]) -> std::path::PathBuf {
    let mut toml = String::new();
    for (url, parser) in entries {
        toml.push_str(&format!(
            "[[blacklist]]\nurl = \"{}\"\nreason = \"ads\"\nsource = \"test\"\nparser = \"{}\"\n\n",
            url, parser
        ));
    }
    let path = dir.join("blacklists.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn file_url(path: &Path) -> String {
    Url::from_file_path(path).unwrap().to_string()
}

fn record_hosts(script: &str) -> Vec<String> {
    script
        .lines()
        .filter_map(|l| l.strip_prefix("update add "))
        .map(|l| l.trim_end_matches(".bindholerpz CNAME .").to_string())
        .collect()
}

#[test]
fn test_generate_zone_from_local_lists() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let hosts = dir.path().join("hosts.txt");
    fs::write(&plain, PLAIN_LIST).unwrap();
    fs::write(&hosts, HOSTS_LIST).unwrap();

    let plain_url = file_url(&plain);
    let hosts_url = file_url(&hosts);
    let config = write_config(
        dir.path(),
        &[
            (plain_url.as_str(), "simple"),
            ("not a url", "simple"),
            (hosts_url.as_str(), "ip_skipper"),
            (hosts_url.as_str(), "adblock"),
        ],
    );
    let sources = load_sources(&config).unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[1].parser, ParserKind::IpSkipper);

    let output = dir.path().join("bindhole.zone");
    let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT).unwrap();
    let mut writer = ZoneWriter::create(&output, &ZoneOptions::default()).unwrap();
    let stats = pipeline::run(&sources, &fetcher, &mut writer).unwrap();
    writer.close().unwrap();

    assert_eq!(stats.processed, 2);
    assert_eq!(stats.accepted, 5);
    assert_eq!(stats.duplicates, 2);

    let script = fs::read_to_string(&output).unwrap();
    assert!(script.starts_with("server 127.0.0.1 53\nttl 600\nzone bindholerpz\n"));
    assert_eq!(
        record_hosts(&script),
        vec![
            "0008d6ba2e.com",
            "0024ad98dd.com",
            "shared.example.com",
            "ck.getcookiestxt.com",
            "wizhumpgyros.com",
        ]
    );
    assert!(script.ends_with("send\n"));
}

#[test]
fn test_every_output_domain_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("mixed.txt");
    let mut body = String::new();
    for i in 0..40 {
        body.push_str(&format!("0.0.0.0 Host-{}.Example.NET.\n", i));
        body.push_str(&format!("0.0.0.0 bad_host_{}\n", i));
    }
    fs::write(&list, body).unwrap();

    let list_url = file_url(&list);
    let config = write_config(dir.path(), &[(list_url.as_str(), "ip_skipper")]);
    let sources = load_sources(&config).unwrap();

    let output = dir.path().join("out.zone");
    let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT).unwrap();
    let mut writer = ZoneWriter::create(&output, &ZoneOptions::default()).unwrap();
    pipeline::run(&sources, &fetcher, &mut writer).unwrap();
    writer.close().unwrap();

    let script = fs::read_to_string(&output).unwrap();
    let hosts = record_hosts(&script);
    assert_eq!(hosts.len(), 40);
    for host in &hosts {
        assert!(is_valid_domain(host), "{}", host);
        assert_eq!(host, &host.to_lowercase());
    }

    // 40 records: sends before records 11, 21 and 31, plus the final one
    assert_eq!(script.lines().filter(|l| *l == "send").count(), 4);
}

#[test]
fn test_failed_run_leaves_closed_script() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    fs::write(&good, "good.example.com\n").unwrap();
    let missing = dir.path().join("missing.txt");

    let good_url = file_url(&good);
    let missing_url = file_url(&missing);
    let config = write_config(
        dir.path(),
        &[(good_url.as_str(), "simple"), (missing_url.as_str(), "simple")],
    );
    let sources = load_sources(&config).unwrap();

    let output = dir.path().join("partial.zone");
    let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT).unwrap();
    let mut writer = ZoneWriter::create(&output, &ZoneOptions::default()).unwrap();
    let outcome = pipeline::run(&sources, &fetcher, &mut writer);
    writer.close().unwrap();

    assert!(outcome.unwrap_err().is_fatal());
    let script = fs::read_to_string(&output).unwrap();
    assert_eq!(record_hosts(&script), vec!["good.example.com"]);
    assert!(script.ends_with("send\n"));
}
