use crate::parser::{CardLayout, NameSource};
use crate::types::SourceConfig;

pub const LIST_URL: &str = "https://www.imdb.com/list/ls052283250/";
pub const BASE_URL: &str = "https://www.imdb.com";

/// Cards of an IMDb user list. Titles are ranked, e.g. `"1. Johnny Depp"`.
pub fn layout() -> CardLayout {
    CardLayout {
        item: "li.ipc-metadata-list-summary-item".to_string(),
        link: "a".to_string(),
        name: NameSource::Heading("h3.ipc-title__text".to_string()),
        image: "img.ipc-image".to_string(),
    }
}

pub fn source() -> SourceConfig {
    SourceConfig {
        source_url: LIST_URL.to_string(),
        base_url: BASE_URL.to_string(),
        layout: layout(),
    }
}
