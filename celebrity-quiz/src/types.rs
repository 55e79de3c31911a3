use std::time::Duration;

pub use interfaces::defs::{CelebrityRecord, ExtractionResult};
pub use interfaces::state::{GameState, GuessOutcome, LoadStatus};

use crate::parser::CardLayout;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_ms: u64,
    pub max_redirects: usize,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Celebrity-Quiz/0.1".to_string(),
            timeout_ms: 10_000,
            max_redirects: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Pause after a correct guess before the next subject loads.
    pub correct_pause_ms: u64,
    /// Pause after giving up, long enough to read the revealed answer.
    pub give_up_pause_ms: u64,
    pub suggestion_limit: usize,
}

impl GameConfig {
    pub fn correct_pause(&self) -> Duration {
        Duration::from_millis(self.correct_pause_ms)
    }

    pub fn give_up_pause(&self) -> Duration {
        Duration::from_millis(self.give_up_pause_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            correct_pause_ms: 1_500,
            give_up_pause_ms: 2_500,
            suggestion_limit: 5,
        }
    }
}

/// Where the roster comes from and how its cards are laid out.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub source_url: String,
    /// Relative image and link URLs on the page are resolved against this.
    pub base_url: String,
    pub layout: CardLayout,
}

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, QuizError>;
