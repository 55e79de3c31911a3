pub mod imdb_list;
pub mod on_this_day;

use crate::types::SourceConfig;

/// Listing pages the quiz knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LayoutPreset {
    #[default]
    OnThisDay,
    ImdbList,
}

impl LayoutPreset {
    pub fn source(self) -> SourceConfig {
        match self {
            LayoutPreset::OnThisDay => on_this_day::source(),
            LayoutPreset::ImdbList => imdb_list::source(),
        }
    }
}
