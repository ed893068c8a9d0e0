use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::cli::Cli;

pub const DEFAULT_ORIGIN: &str = "https://www.fanfiction.net";
pub const DEFAULT_OUT_DIR: &str = "./json";
pub const DEFAULT_SECTION_DELAY_MS: u64 = 10_000;
pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 5_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const SECTIONED_FILE_NAME: &str = "fandom.json";
pub const UNIFIED_FILE_NAME: &str = "unified-fandom.json";
pub const EXCEPTIONAL_FILE_NAME: &str = "exceptional-fandom.json";

/// Non-crossover category pages followed by their crossover editions.
pub const DEFAULT_SECTION_PATHS: [&str; 18] = [
    "/anime/",
    "/book/",
    "/cartoon/",
    "/comic/",
    "/game/",
    "/misc/",
    "/play/",
    "/movie/",
    "/tv/",
    "/crossovers/anime/",
    "/crossovers/book/",
    "/crossovers/cartoon/",
    "/crossovers/comic/",
    "/crossovers/game/",
    "/crossovers/misc/",
    "/crossovers/play/",
    "/crossovers/movie/",
    "/crossovers/tv/",
];

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub origin: Url,
    pub section_urls: Vec<Url>,
    pub out_dir: PathBuf,
    pub section_delay: Duration,
    pub lookup_delay: Duration,
    pub timeout: Duration,
}

impl ScrapeConfig {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let origin = parse_origin(&cli.origin)?;

        let paths: Vec<&str> = if cli.sections.is_empty() {
            DEFAULT_SECTION_PATHS.to_vec()
        } else {
            cli.sections.iter().map(String::as_str).collect()
        };
        let section_urls = paths
            .into_iter()
            .map(|path| section_url(&origin, path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            origin,
            section_urls,
            out_dir: PathBuf::from(&cli.out),
            section_delay: Duration::from_millis(cli.delay_ms),
            lookup_delay: Duration::from_millis(cli.lookup_delay_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
        })
    }

    pub fn sectioned_path(&self) -> PathBuf {
        self.out_dir.join(SECTIONED_FILE_NAME)
    }

    pub fn unified_path(&self) -> PathBuf {
        self.out_dir.join(UNIFIED_FILE_NAME)
    }

    pub fn exceptional_path(&self) -> PathBuf {
        self.out_dir.join(EXCEPTIONAL_FILE_NAME)
    }
}

fn parse_origin(raw: &str) -> anyhow::Result<Url> {
    let origin = Url::parse(raw).with_context(|| format!("parse --origin: {raw}"))?;
    if origin.scheme() != "http" && origin.scheme() != "https" {
        anyhow::bail!("--origin must be http/https: {origin}");
    }
    if origin.host_str().is_none() {
        anyhow::bail!("--origin must have host: {origin}");
    }
    // Section paths and fandom links are site-absolute.
    if origin.path() != "/" || origin.query().is_some() || origin.fragment().is_some() {
        anyhow::bail!("--origin must be a bare origin without path: {origin}");
    }
    Ok(origin)
}

/// Section pages are always addressed with a trailing slash so the last path
/// segment is the section id.
fn section_url(origin: &Url, path: &str) -> anyhow::Result<Url> {
    let trimmed = path.trim();
    if trimmed.trim_matches('/').is_empty() {
        anyhow::bail!("section path must name a category: {path:?}");
    }

    let mut joined = format!("/{}", trimmed.trim_start_matches('/'));
    if !joined.ends_with('/') {
        joined.push('/');
    }
    origin
        .join(&joined)
        .with_context(|| format!("build section url for {path:?}"))
}
