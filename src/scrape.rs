use anyhow::Context as _;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::cli::Cli;
use crate::config::ScrapeConfig;
use crate::fetch::{Fetcher, HttpFetcher, Sleeper, ThreadSleeper};
use crate::formats::{ExceptionalDatabase, SectionRecord, SectionedDatabase, UnifiedDatabase};
use crate::resolve::{BrowsePageLookup, FandomNameLookup};
use crate::section::{SectionIdentity, extract_section};

/// All sections scraped in one run, stamped with the time the run began.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    pub date: String,
    pub sections: Vec<SectionRecord>,
}

impl ScrapeSession {
    pub fn new(started_at: DateTime<Utc>, sections: Vec<SectionRecord>) -> Self {
        Self {
            date: session_timestamp(started_at),
            sections,
        }
    }

    pub fn sectioned(&self) -> SectionedDatabase {
        crate::aggregate::sectioned(&self.date, &self.sections)
    }

    pub fn unified(&self) -> UnifiedDatabase {
        crate::aggregate::unified(&self.date, &self.sections)
    }

    pub fn exceptional(&self) -> ExceptionalDatabase {
        crate::aggregate::exceptional(&self.date, &self.sections)
    }
}

/// RFC 3339 in UTC with microseconds and a `+00:00` offset.
pub fn session_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ScrapeConfig::from_cli(&cli).context("build scrape config")?;
    let started_at = Utc::now();

    let fetcher = HttpFetcher::new(config.timeout)?;
    let lookup = BrowsePageLookup::new(&fetcher, config.lookup_delay);

    let sections = scrape_sections(&config, &fetcher, &lookup, &ThreadSleeper)?;
    let session = ScrapeSession::new(started_at, sections);
    write_views(&config, &session)
}

/// Fetch and extract every configured section in order, pausing between
/// sections. A section page that cannot be fetched aborts the run; a page
/// that cannot be fully extracted keeps whatever was extracted.
pub fn scrape_sections<F, L, S>(
    config: &ScrapeConfig,
    fetcher: &F,
    lookup: &L,
    sleeper: &S,
) -> anyhow::Result<Vec<SectionRecord>>
where
    F: Fetcher + ?Sized,
    L: FandomNameLookup + ?Sized,
    S: Sleeper + ?Sized,
{
    let identities = config
        .section_urls
        .iter()
        .map(SectionIdentity::from_url)
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::info!(sections = identities.len(), "start scraping");

    let mut sections = Vec::with_capacity(identities.len());
    for (index, identity) in identities.iter().enumerate() {
        tracing::info!(
            url = %identity.url,
            edition = identity.edition.as_str(),
            "scrape section"
        );
        let html = fetcher
            .fetch(&identity.url)
            .with_context(|| format!("fetch section page: {}", identity.url))?;

        let extraction = extract_section(identity, &html, &config.origin, lookup);
        if let Some(err) = &extraction.error {
            tracing::warn!(
                url = %identity.url,
                error = %err,
                cause = ?err,
                fandoms = extraction.record.fandoms.len(),
                "section extraction stopped early; keeping partial list"
            );
        } else {
            tracing::info!(
                url = %identity.url,
                name = %extraction.record.name,
                fandoms = extraction.record.fandoms.len(),
                "scraped section"
            );
        }
        sections.push(extraction.record);

        if index + 1 < identities.len() {
            sleeper.sleep(config.section_delay);
        }
    }

    Ok(sections)
}

pub fn write_views(config: &ScrapeConfig, session: &ScrapeSession) -> anyhow::Result<()> {
    tracing::info!("make fandom database");
    crate::store::write_json_file(&config.sectioned_path(), &session.sectioned())
        .context("write sectioned view")?;

    tracing::info!("make unified fandom database");
    crate::store::write_json_file(&config.unified_path(), &session.unified())
        .context("write unified view")?;

    tracing::info!("make exceptional fandom database");
    crate::store::write_json_file(&config.exceptional_path(), &session.exceptional())
        .context("write exceptional view")?;

    Ok(())
}
