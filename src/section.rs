use std::sync::LazyLock;

use anyhow::Context as _;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::count::parse_rough_count;
use crate::error::{ExtractError, ParseError};
use crate::formats::{Edition, FandomRecord, SectionRecord};
use crate::resolve::{FandomNameLookup, resolve_name};

const CROSSOVER_SEGMENT: &str = "crossovers";

struct Selectors {
    title: Selector,
    listing: Selector,
    entry: Selector,
    anchor: Selector,
    count: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    title: Selector::parse("title").expect("title selector"),
    listing: Selector::parse("div#list_output").expect("listing selector"),
    entry: Selector::parse("div").expect("entry selector"),
    anchor: Selector::parse("a").expect("anchor selector"),
    count: Selector::parse("span").expect("count selector"),
});

/// What a section URL alone says about the section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionIdentity {
    pub id: String,
    pub url: Url,
    pub edition: Edition,
}

impl SectionIdentity {
    /// `.../crossovers/book/` is the crossover edition of `book`;
    /// `.../anime/` is the regular edition of `anime`.
    pub fn from_url(url: &Url) -> anyhow::Result<Self> {
        let segments: Vec<&str> = url
            .path_segments()
            .with_context(|| format!("section url has no path: {url}"))?
            .filter(|segment| !segment.is_empty())
            .collect();

        let (id, parents) = segments
            .split_last()
            .with_context(|| format!("section url has no category segment: {url}"))?;
        let edition = match parents.last() {
            Some(&parent) if parent == CROSSOVER_SEGMENT => Edition::Crossover,
            _ => Edition::NotCrossover,
        };

        Ok(Self {
            id: (*id).to_owned(),
            url: url.clone(),
            edition,
        })
    }
}

/// Result of extracting one section page. `record` holds whatever was
/// extracted before `error`, if any.
#[derive(Debug)]
pub struct Extraction {
    pub record: SectionRecord,
    pub error: Option<ExtractError>,
}

pub fn extract_section<L: FandomNameLookup + ?Sized>(
    identity: &SectionIdentity,
    html: &str,
    origin: &Url,
    lookup: &L,
) -> Extraction {
    let mut record = SectionRecord {
        id: identity.id.clone(),
        name: String::new(),
        url: identity.url.to_string(),
        edition: identity.edition,
        fandoms: Vec::new(),
    };

    let document = Html::parse_document(html);
    let error = fill_section(&document, origin, lookup, &mut record).err();

    Extraction { record, error }
}

fn fill_section<L: FandomNameLookup + ?Sized>(
    document: &Html,
    origin: &Url,
    lookup: &L,
    record: &mut SectionRecord,
) -> Result<(), ExtractError> {
    let title = page_title(document).ok_or(ParseError::MissingTitle)?;
    record.name = section_name_from_title(&title).to_owned();

    let listing = document
        .select(&SELECTORS.listing)
        .next()
        .ok_or(ParseError::MissingListing)?;

    for (index, entry) in listing.select(&SELECTORS.entry).enumerate() {
        let fandom = extract_fandom(index, entry, origin, lookup)?;
        record.fandoms.push(fandom);
    }

    Ok(())
}

fn extract_fandom<L: FandomNameLookup + ?Sized>(
    index: usize,
    entry: ElementRef<'_>,
    origin: &Url,
    lookup: &L,
) -> Result<FandomRecord, ExtractError> {
    let anchor = entry
        .select(&SELECTORS.anchor)
        .next()
        .ok_or(ParseError::MissingAnchor { index })?;
    let href = anchor
        .value()
        .attr("href")
        .ok_or(ParseError::MissingHref { index })?;
    let url = origin
        .join(href)
        .map_err(|err| ParseError::InvalidFandomUrl {
            href: href.to_owned(),
            reason: err.to_string(),
        })?;

    let count_text = entry
        .select(&SELECTORS.count)
        .next()
        .map(|span| span.text().collect::<String>())
        .ok_or(ParseError::MissingCount { index })?;
    let rough_story_number = parse_rough_count(&count_text)?;

    let text = anchor.text().collect::<String>();
    let name = resolve_name(anchor.value().attr("title"), &text, &url, lookup)?;

    Ok(FandomRecord {
        name,
        url: url.to_string(),
        rough_story_number,
    })
}

pub fn page_title(document: &Html) -> Option<String> {
    document
        .select(&SELECTORS.title)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_owned())
}

/// `"Anime Crossover | FanFiction"` and `"Anime | FanFiction"` both become
/// `"Anime"`.
pub fn section_name_from_title(title: &str) -> &str {
    match title.strip_suffix(" | FanFiction") {
        Some(rest) => rest.strip_suffix(" Crossover").unwrap_or(rest),
        None => title,
    }
}
