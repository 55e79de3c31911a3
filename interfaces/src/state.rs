use std::collections::HashSet;

use crate::defs::{CelebrityRecord, ExtractionResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Error(String),
    /// Every record of the roster has been shown. A win, not a failure.
    Exhausted(String),
}

/// Feedback for the most recent guess of the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuessOutcome {
    #[default]
    None,
    Correct,
    Wrong,
}

/// Everything a rendering surface needs to draw the quiz.
///
/// Snapshots are replaced whole; nothing observes a half-applied update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub roster: Vec<CelebrityRecord>,
    pub seen_ids: HashSet<String>,
    pub current: Option<CelebrityRecord>,
    pub user_input: String,
    pub suggestions: Vec<String>,
    pub score: u32,
    pub attempts: u32,
    pub revealed: bool,
    pub outcome: GuessOutcome,
    pub load_status: LoadStatus,
    /// A delayed advance to the next round is pending.
    pub resolving: bool,
}

impl GameState {
    pub fn is_loading(&self) -> bool {
        self.load_status == LoadStatus::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.load_status, LoadStatus::Exhausted(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load_status {
            LoadStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The round accepts guesses: a subject is showing and no advance is pending.
    pub fn round_active(&self) -> bool {
        self.load_status == LoadStatus::Ready && self.current.is_some() && !self.resolving
    }

    /// The last extraction as this snapshot sees it. `Pending` while a load
    /// is in flight.
    pub fn extraction(&self) -> ExtractionResult {
        match &self.load_status {
            LoadStatus::Loading => ExtractionResult::Pending,
            LoadStatus::Error(message) => ExtractionResult::Failure(message.clone()),
            LoadStatus::Ready | LoadStatus::Exhausted(_) => ExtractionResult::Success(self.roster.clone()),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            seen_ids: HashSet::new(),
            current: None,
            user_input: String::new(),
            suggestions: Vec::new(),
            score: 0,
            attempts: 0,
            revealed: false,
            outcome: GuessOutcome::None,
            load_status: LoadStatus::Loading,
            resolving: false,
        }
    }
}
