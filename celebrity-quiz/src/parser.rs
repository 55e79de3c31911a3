use crate::types::{CelebrityRecord, QuizError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info};
use url::Url;

static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.\s*)+").expect("ordinal prefix pattern is valid"));

/// Where a card keeps its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSource {
    /// Text placed directly inside the card's link, ignoring nested markup.
    LinkText,
    /// Full text of the first descendant matching this selector.
    Heading(String),
}

/// Selectors describing one "celebrity card" on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub item: String,
    pub link: String,
    pub name: NameSource,
    pub image: String,
}

/// What a pass over a document found.
#[derive(Debug, Default)]
pub struct CardScan {
    /// Nodes that matched the card selector, valid or not.
    pub matched: usize,
    /// Valid records, deduplicated by name in first-seen order.
    pub records: Vec<CelebrityRecord>,
}

pub struct CardParser {
    item: Selector,
    link: Selector,
    heading: Option<Selector>,
    image: Selector,
}

impl CardParser {
    pub fn new(layout: &CardLayout) -> Result<Self> {
        let heading = match &layout.name {
            NameSource::LinkText => None,
            NameSource::Heading(selector) => Some(compile(selector)?),
        };

        Ok(Self {
            item: compile(&layout.item)?,
            link: compile(&layout.link)?,
            heading,
            image: compile(&layout.image)?,
        })
    }

    pub fn parse(&self, content: &str, base_url: &Url) -> CardScan {
        debug!("Parsing page content ({} bytes)", content.len());
        let document = Html::parse_document(content);

        let mut matched = 0;
        let mut records = Vec::new();
        for card in document.select(&self.item) {
            matched += 1;
            match self.parse_card(card, base_url) {
                Some(record) => records.push(record),
                None => debug!("Skipping incomplete card #{}", matched),
            }
        }

        // Same person can appear more than once on a page
        let records = dedup_by_name(records);
        info!("Parsed {} cards into {} records", matched, records.len());
        CardScan { matched, records }
    }

    fn parse_card(&self, card: ElementRef<'_>, base_url: &Url) -> Option<CelebrityRecord> {
        let link = card.select(&self.link).next();

        let id = link
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| link_id(href, base_url));

        // Name comes from a heading or from the link's own text
        let raw_name = match &self.heading {
            Some(heading) => card.select(heading).next().map(|h| h.text().collect::<String>()),
            None => link.map(own_text),
        }?;
        let name = normalize_name(&raw_name);
        if name.is_empty() {
            return None;
        }

        // Prefer the first srcset candidate, it is usually the larger photo
        let image = card.select(&self.image).next()?;
        let candidate = image
            .value()
            .attr("srcset")
            .and_then(first_srcset_candidate)
            .or_else(|| image.value().attr("src").map(str::trim).filter(|src| !src.is_empty()))?;
        let image_url = match base_url.join(candidate) {
            Ok(url) => url.to_string(),
            Err(e) => {
                debug!("Unresolvable image URL {:?} for {}: {}", candidate, name, e);
                return None;
            }
        };

        Some(CelebrityRecord::new(id, name, image_url))
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| QuizError::Selector(format!("{selector}: {e}")))
}

/// Trims, collapses inner whitespace and strips leading ordinals such as `"3. "`.
///
/// Applying it to an already normalized name is a no-op.
pub fn normalize_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    ORDINAL_PREFIX.replace(&collapsed, "").trim().to_string()
}

/// Keeps the first record for each name.
pub fn dedup_by_name(records: Vec<CelebrityRecord>) -> Vec<CelebrityRecord> {
    let total = records.len();
    let mut seen = HashSet::new();
    let unique: Vec<CelebrityRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.name.clone()))
        .collect();

    let removed = total - unique.len();
    if removed > 0 {
        debug!("Removed {} duplicate records", removed);
    }
    unique
}

fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect()
}

/// Last non-empty path segment of the card link.
fn link_id(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let url = base_url.join(href).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

fn first_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset.split(',').next()?.split_whitespace().next()
}
