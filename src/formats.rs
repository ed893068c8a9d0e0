use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FandomRecord {
    pub name: String,
    pub url: String,
    pub rough_story_number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    NotCrossover,
    Crossover,
}

impl Edition {
    pub fn is_crossover(self) -> bool {
        matches!(self, Self::Crossover)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotCrossover => "not_crossover",
            Self::Crossover => "crossover",
        }
    }
}

/// One scraped category page. Identity fields come from the URL; `name` and
/// `fandoms` from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub edition: Edition,
    pub fandoms: Vec<FandomRecord>,
}

impl SectionRecord {
    pub fn is_crossover(&self) -> bool {
        self.edition.is_crossover()
    }
}

/// `fandom.json`: sections grouped by edition, then by section id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionedDatabase {
    pub date: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub not_crossover: BTreeMap<String, SectionListing>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub crossover: BTreeMap<String, SectionListing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionListing {
    pub name: String,
    pub url: String,
    pub fandoms: Vec<FandomRecord>,
}

/// `unified-fandom.json`: every fandom name with each place it was listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedDatabase {
    pub date: String,
    pub sections: BTreeMap<String, UnifiedSection>,
    pub fandoms: BTreeMap<String, Vec<FandomAppearance>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedSection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_crossover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crossover_url: Option<String>,
}

impl UnifiedSection {
    pub fn url_mut(&mut self, edition: Edition) -> &mut Option<String> {
        match edition {
            Edition::NotCrossover => &mut self.not_crossover_url,
            Edition::Crossover => &mut self.crossover_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FandomAppearance {
    pub section_id: String,
    pub crossover: bool,
    pub url: String,
    pub rough_story_number: u64,
}

/// `exceptional-fandom.json`: crossover names that themselves join fandoms
/// with `" & "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionalDatabase {
    pub date: String,
    pub fandoms: Vec<String>,
}
