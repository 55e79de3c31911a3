use crate::parser::{CardLayout, CardParser};
use crate::traits::DocumentSource;
use crate::types::{ExtractionResult, QuizError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

pub const NO_LIST_ITEMS: &str = "Could not find list items. The site structure may have changed.";
pub const NO_RECORDS: &str = "Actors could not be extracted.";

pub fn page_loading_error(cause: impl std::fmt::Display) -> String {
    format!("Page loading error: {cause}")
}

/// Fetches a listing page and turns its cards into celebrity records.
pub struct Extractor {
    source: Arc<dyn DocumentSource>,
    parser: CardParser,
    timeout: Duration,
}

impl Extractor {
    pub fn new(source: Arc<dyn DocumentSource>, layout: &CardLayout, timeout: Duration) -> Result<Self> {
        Ok(Self {
            source,
            parser: CardParser::new(layout)?,
            timeout,
        })
    }

    /// One fetch+parse pass. Never retries and never returns `Pending`.
    ///
    /// The three failure messages separate "site down" (transport), "site
    /// changed shape" (no card matched) and "cards matched but none were
    /// usable".
    pub async fn extract(&self, source_url: &str, base_url: &str) -> ExtractionResult {
        info!("Extracting celebrities from {}", source_url);

        // Validate the base URL before touching the network
        let base = match Url::parse(base_url) {
            Ok(base) => base,
            Err(e) => {
                error!("Invalid base URL {}: {}", base_url, e);
                return ExtractionResult::Failure(page_loading_error(QuizError::from(e)));
            }
        };

        // Fetch the page
        let content = match self.source.fetch(source_url, self.timeout).await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to load {}: {}", source_url, e);
                return ExtractionResult::Failure(page_loading_error(e));
            }
        };

        // Parse cards into records
        let scan = self.parser.parse(&content, &base);

        if scan.matched == 0 {
            warn!("No cards matched on {}", source_url);
            return ExtractionResult::Failure(NO_LIST_ITEMS.to_string());
        }

        if scan.records.is_empty() {
            warn!("{} cards matched on {} but none were complete", scan.matched, source_url);
            return ExtractionResult::Failure(NO_RECORDS.to_string());
        }

        info!("Extracted {} celebrities from {}", scan.records.len(), source_url);
        ExtractionResult::Success(scan.records)
    }
}
