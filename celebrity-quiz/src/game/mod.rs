pub mod rules;
pub mod session;
pub mod timer;

pub use rules::{GameRules, Transition};
pub use session::GameSession;
pub use timer::RoundTimer;
