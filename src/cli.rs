use clap::Parser;

/// Scrape per-fandom story counts from a fan-fiction archive's category pages
/// and write them as JSON views.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Bare site origin (scheme, host, port) that section paths and fandom
    /// links are resolved against.
    #[arg(long, default_value = crate::config::DEFAULT_ORIGIN)]
    pub origin: String,

    /// Section path to scrape, e.g. `/anime/` or `/crossovers/anime/`
    /// (repeatable; replaces the built-in list).
    #[arg(long = "section", value_name = "PATH")]
    pub sections: Vec<String>,

    /// Output directory for the JSON views.
    #[arg(long, default_value = crate::config::DEFAULT_OUT_DIR)]
    pub out: String,

    /// Delay after each section page fetch (politeness).
    #[arg(long, default_value_t = crate::config::DEFAULT_SECTION_DELAY_MS)]
    pub delay_ms: u64,

    /// Cool-down after each fandom browse page lookup.
    #[arg(long, default_value_t = crate::config::DEFAULT_LOOKUP_DELAY_MS)]
    pub lookup_delay_ms: u64,

    /// HTTP request timeout.
    #[arg(long, default_value_t = crate::config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}
