use crate::parser::{CardLayout, NameSource};
use crate::types::SourceConfig;

pub const ACTORS_URL: &str = "https://www.onthisday.com/people/actors";
pub const BASE_URL: &str = "https://www.onthisday.com";

/// Cards of the onthisday.com people listing.
///
/// Each `li` holds a link to the person's page, whose own text is the name,
/// and a photo whose `srcset` carries the larger rendition.
pub fn layout() -> CardLayout {
    CardLayout {
        item: "ul.photo-list.photo-list--full-width li".to_string(),
        link: "a".to_string(),
        name: NameSource::LinkText,
        image: "img".to_string(),
    }
}

pub fn source() -> SourceConfig {
    SourceConfig {
        source_url: ACTORS_URL.to_string(),
        base_url: BASE_URL.to_string(),
        layout: layout(),
    }
}
