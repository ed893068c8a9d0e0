//! Derived views over scraped sections. Each function builds a fresh value
//! from borrowed records and may be called any number of times.

use std::collections::{BTreeMap, BTreeSet};

use crate::formats::{
    Edition, ExceptionalDatabase, FandomAppearance, SectionListing, SectionRecord,
    SectionedDatabase, UnifiedDatabase, UnifiedSection,
};

const MULTI_FANDOM_SEPARATOR: &str = " & ";

/// Sections grouped by edition and id, fandoms sorted by name.
pub fn sectioned(date: &str, sections: &[SectionRecord]) -> SectionedDatabase {
    let mut database = SectionedDatabase {
        date: date.to_owned(),
        not_crossover: BTreeMap::new(),
        crossover: BTreeMap::new(),
    };

    for section in sections {
        let mut fandoms = section.fandoms.clone();
        fandoms.sort_by(|a, b| a.name.cmp(&b.name));

        let listing = SectionListing {
            name: section.name.clone(),
            url: section.url.clone(),
            fandoms,
        };
        let group = match section.edition {
            Edition::NotCrossover => &mut database.not_crossover,
            Edition::Crossover => &mut database.crossover,
        };
        group.insert(section.id.clone(), listing);
    }

    database
}

/// One entry per section id (both editions merged) and one key per fandom
/// name, listing every place the name was scraped in section order.
pub fn unified(date: &str, sections: &[SectionRecord]) -> UnifiedDatabase {
    let mut merged: BTreeMap<String, UnifiedSection> = BTreeMap::new();
    for section in sections {
        let entry = merged
            .entry(section.id.clone())
            .or_insert_with(|| UnifiedSection {
                name: section.name.clone(),
                not_crossover_url: None,
                crossover_url: None,
            });
        *entry.url_mut(section.edition) = Some(section.url.clone());
    }

    let mut fandoms: BTreeMap<String, Vec<FandomAppearance>> = BTreeMap::new();
    for section in sections {
        for fandom in &section.fandoms {
            fandoms
                .entry(fandom.name.clone())
                .or_default()
                .push(FandomAppearance {
                    section_id: section.id.clone(),
                    crossover: section.is_crossover(),
                    url: fandom.url.clone(),
                    rough_story_number: fandom.rough_story_number,
                });
        }
    }

    UnifiedDatabase {
        date: date.to_owned(),
        sections: merged,
        fandoms,
    }
}

/// Crossover fandom names containing `" & "`, deduplicated and sorted.
pub fn exceptional(date: &str, sections: &[SectionRecord]) -> ExceptionalDatabase {
    let names: BTreeSet<&str> = sections
        .iter()
        .filter(|section| section.is_crossover())
        .flat_map(|section| &section.fandoms)
        .map(|fandom| fandom.name.as_str())
        .filter(|name| name.contains(MULTI_FANDOM_SEPARATOR))
        .collect();

    ExceptionalDatabase {
        date: date.to_owned(),
        fandoms: names.into_iter().map(str::to_owned).collect(),
    }
}
