pub mod defs;
pub mod state;

pub use defs::{CelebrityRecord, ExtractionResult};
pub use state::{GameState, GuessOutcome, LoadStatus};
