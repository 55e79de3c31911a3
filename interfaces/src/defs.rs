use serde::{Deserialize, Serialize};

/// One scraped celebrity card.
///
/// Records are only ever built from normalized, non-blank fields; the
/// scraper discards partial cards instead of filling in placeholders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrityRecord {
    pub id: Option<String>,
    pub name: String,
    pub image_url: String,
}

impl CelebrityRecord {
    pub fn new(id: Option<String>, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.filter(|id| !id.trim().is_empty()),
            name: name.into(),
            image_url: image_url.into(),
        }
    }

    /// Identity used for "already shown" tracking.
    ///
    /// Falls back to the name when the page carried no id; names are unique
    /// once a roster has been deduplicated.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// Outcome of one fetch+parse pass over the source page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExtractionResult {
    Success(Vec<CelebrityRecord>),
    Failure(String),
    /// The single outstanding fetch is still in flight.
    ///
    /// Sessions surface this as `LoadStatus::Loading` on their snapshot and
    /// expose it through `GameState::extraction()`.
    #[default]
    Pending,
}

impl ExtractionResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, ExtractionResult::Pending)
    }

    pub fn records(&self) -> Option<&[CelebrityRecord]> {
        match self {
            ExtractionResult::Success(records) => Some(records),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ExtractionResult::Failure(reason) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefers_id_over_name() {
        let record = CelebrityRecord::new(Some("johnny-depp".to_owned()), "Johnny Depp", "https://x/1.jpg");
        assert_eq!(record.key(), "johnny-depp");

        let anonymous = CelebrityRecord::new(None, "Johnny Depp", "https://x/1.jpg");
        assert_eq!(anonymous.key(), "Johnny Depp");
    }

    #[test]
    fn blank_id_is_treated_as_absent() {
        let record = CelebrityRecord::new(Some("  ".to_owned()), "Tom Hanks", "https://x/2.jpg");
        assert_eq!(record.id, None);
        assert_eq!(record.key(), "Tom Hanks");
    }

    #[test]
    fn pending_is_the_default_and_carries_nothing() {
        let result = ExtractionResult::default();
        assert!(result.is_pending());
        assert!(result.records().is_none());
        assert!(result.failure().is_none());
    }
}
