//! Fandom name resolution for listing links.
//!
//! Listing links carry the full fandom name in their `title` attribute and a
//! possibly shortened name as link text. When the archive escapes a double
//! quote inside the attribute (`\"`), the HTML parser ends the attribute at the
//! escaped quote and the value ends with a lone backslash. Such a title cannot
//! be trusted; the link text is used instead, and when the text itself was cut
//! off with `...` the name is looked up on the fandom's own browse page.

use std::time::Duration;

use scraper::Html;
use url::Url;

use crate::error::{ExtractError, ParseError};
use crate::fetch::{Fetcher, Sleeper, ThreadSleeper};

const TRUNCATION_MARK: &str = "...";

/// How a listing link's name must be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleVerdict {
    /// The `title` attribute is intact; carries the unescaped name.
    Trustworthy(String),
    /// The `title` attribute is corrupt but the link text is complete.
    UseText(String),
    /// Both are unusable; the browse page must be consulted.
    NeedsLookup,
}

pub fn classify(title: Option<&str>, text: &str) -> TitleVerdict {
    match title {
        Some(title) if !title.ends_with('\\') => {
            TitleVerdict::Trustworthy(title.replace("\\'", "'"))
        }
        _ if text.ends_with(TRUNCATION_MARK) => TitleVerdict::NeedsLookup,
        _ => TitleVerdict::UseText(text.to_owned()),
    }
}

/// Port for the blocking fallback lookup of a fandom's full name.
pub trait FandomNameLookup {
    fn lookup(&self, fandom_url: &Url) -> Result<String, ExtractError>;
}

/// Resolve a listing link's fandom name. A looked-up name is final and is not
/// re-checked for corruption.
pub fn resolve_name<L: FandomNameLookup + ?Sized>(
    title: Option<&str>,
    text: &str,
    fandom_url: &Url,
    lookup: &L,
) -> Result<String, ExtractError> {
    let verdict = classify(title, text);
    tracing::debug!(url = %fandom_url, ?verdict, "classified fandom title");
    match verdict {
        TitleVerdict::Trustworthy(name) | TitleVerdict::UseText(name) => Ok(name),
        TitleVerdict::NeedsLookup => lookup.lookup(fandom_url),
    }
}

/// Reads the fandom name from the `<title>` of its browse page, then waits
/// out a cool-down before returning, whether or not the fetch succeeded.
#[derive(Debug, Clone)]
pub struct BrowsePageLookup<F, S = ThreadSleeper> {
    fetcher: F,
    cool_down: Duration,
    sleeper: S,
}

impl<F: Fetcher> BrowsePageLookup<F> {
    pub fn new(fetcher: F, cool_down: Duration) -> Self {
        Self::with_sleeper(fetcher, cool_down, ThreadSleeper)
    }
}

impl<F: Fetcher, S: Sleeper> BrowsePageLookup<F, S> {
    pub fn with_sleeper(fetcher: F, cool_down: Duration, sleeper: S) -> Self {
        Self {
            fetcher,
            cool_down,
            sleeper,
        }
    }
}

impl<F: Fetcher, S: Sleeper> FandomNameLookup for BrowsePageLookup<F, S> {
    fn lookup(&self, fandom_url: &Url) -> Result<String, ExtractError> {
        tracing::info!(url = %fandom_url, "look up truncated fandom name");
        let fetched = self.fetcher.fetch(fandom_url);
        self.sleeper.sleep(self.cool_down);

        let html = fetched.map_err(ExtractError::Lookup)?;
        let document = Html::parse_document(&html);
        let title = crate::section::page_title(&document).ok_or(ParseError::MissingTitle)?;
        Ok(fandom_name_from_browse_title(&title))
    }
}

/// `"Foo FanFiction Archive | FanFiction"` and `"Foo Crossover | FanFiction"`
/// both become `"Foo"`; other titles are kept whole.
pub fn fandom_name_from_browse_title(title: &str) -> String {
    title
        .strip_suffix(" | FanFiction")
        .and_then(|rest| {
            rest.strip_suffix(" FanFiction Archive")
                .or_else(|| rest.strip_suffix(" Crossover"))
        })
        .unwrap_or(title)
        .to_owned()
}
