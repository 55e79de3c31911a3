pub mod types;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod extractor;
pub mod sources;
pub mod game;

pub use types::*;
pub use traits::DocumentSource;
pub use fetcher::Fetcher;
pub use parser::{CardLayout, CardParser, NameSource};
pub use extractor::Extractor;
pub use sources::LayoutPreset;
pub use game::{GameRules, GameSession, RoundTimer};
