use crate::types::{ExtractionResult, GameConfig, GameState, GuessOutcome, LoadStatus};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

pub const ALL_GUESSED: &str = "Congratulations! You guessed them all!";
pub const NOTHING_TO_SHOW: &str = "The page listed no celebrities to guess.";

/// Result of an event that may schedule the next round.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    /// Delay before `advance_round` should run, if the round was resolved.
    pub advance_after: Option<Duration>,
}

impl Transition {
    fn stay(state: GameState) -> Self {
        Self { state, advance_after: None }
    }
}

/// Transition rules of the quiz. Every method takes the previous snapshot
/// and returns a fresh one.
#[derive(Debug, Clone, Default)]
pub struct GameRules {
    config: GameConfig,
}

impl GameRules {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Enters `Loading` for a (re)load. Counters survive, the round does not.
    pub fn begin_loading(&self, state: &GameState) -> GameState {
        GameState {
            seen_ids: Default::default(),
            current: None,
            user_input: String::new(),
            suggestions: Vec::new(),
            revealed: false,
            outcome: GuessOutcome::None,
            load_status: LoadStatus::Loading,
            resolving: false,
            ..state.clone()
        }
    }

    pub fn apply_extraction<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        result: ExtractionResult,
        rng: &mut R,
    ) -> GameState {
        match result {
            ExtractionResult::Success(records) if records.is_empty() => GameState {
                load_status: LoadStatus::Error(NOTHING_TO_SHOW.to_string()),
                ..state.clone()
            },
            ExtractionResult::Success(records) => {
                info!("Roster loaded with {} celebrities", records.len());
                let loaded = GameState {
                    roster: records,
                    seen_ids: Default::default(),
                    ..state.clone()
                };
                self.advance_round(&loaded, rng)
            }
            ExtractionResult::Failure(message) => GameState {
                load_status: LoadStatus::Error(message),
                ..state.clone()
            },
            ExtractionResult::Pending => state.clone(),
        }
    }

    /// Picks an unseen subject uniformly at random, or ends the game.
    pub fn advance_round<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> GameState {
        let candidates: Vec<_> = state
            .roster
            .iter()
            .filter(|record| !state.seen_ids.contains(record.key()))
            .collect();

        let mut next = GameState {
            user_input: String::new(),
            suggestions: Vec::new(),
            revealed: false,
            outcome: GuessOutcome::None,
            resolving: false,
            ..state.clone()
        };

        match candidates.choose(rng) {
            Some(&record) => {
                debug!("Next subject: {} ({} left)", record.name, candidates.len() - 1);
                next.seen_ids.insert(record.key().to_string());
                next.current = Some(record.clone());
                next.load_status = LoadStatus::Ready;
            }
            None => {
                info!("Roster exhausted after {} rounds", state.seen_ids.len());
                next.current = None;
                next.load_status = LoadStatus::Exhausted(ALL_GUESSED.to_string());
            }
        }
        next
    }

    pub fn update_input(&self, state: &GameState, text: &str) -> GameState {
        GameState {
            user_input: text.to_string(),
            suggestions: self.suggestions(state, text),
            ..state.clone()
        }
    }

    /// First roster names containing `text`, case-insensitively.
    pub fn suggestions(&self, state: &GameState, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let needle = text.to_lowercase();
        state
            .roster
            .iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .take(self.config.suggestion_limit)
            .map(|record| record.name.clone())
            .collect()
    }

    /// Ignored unless a round is active; see [`GameState::round_active`].
    pub fn submit_guess(&self, state: &GameState, text: &str) -> Transition {
        let Some(current) = state.current.as_ref().filter(|_| state.round_active()) else {
            debug!("Ignoring guess {:?}: no active round", text);
            return Transition::stay(state.clone());
        };

        if names_match(text, &current.name) {
            Transition {
                state: GameState {
                    outcome: GuessOutcome::Correct,
                    score: state.score + 1,
                    user_input: String::new(),
                    suggestions: Vec::new(),
                    resolving: true,
                    ..state.clone()
                },
                advance_after: Some(self.config.correct_pause()),
            }
        } else {
            Transition::stay(GameState {
                outcome: GuessOutcome::Wrong,
                attempts: state.attempts + 1,
                user_input: String::new(),
                suggestions: Vec::new(),
                ..state.clone()
            })
        }
    }

    pub fn give_up(&self, state: &GameState) -> Transition {
        if !state.round_active() {
            debug!("Ignoring give up: no active round");
            return Transition::stay(state.clone());
        }

        Transition {
            state: GameState {
                revealed: true,
                user_input: String::new(),
                suggestions: Vec::new(),
                resolving: true,
                ..state.clone()
            },
            advance_after: Some(self.config.give_up_pause()),
        }
    }
}

fn names_match(guess: &str, name: &str) -> bool {
    guess.trim().to_lowercase() == name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CelebrityRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(id: &str, name: &str) -> CelebrityRecord {
        CelebrityRecord::new(Some(id.to_string()), name, format!("https://x/{id}.jpg"))
    }

    fn roster() -> Vec<CelebrityRecord> {
        vec![
            record("1", "Johnny Depp"),
            record("2", "Penelope Cruz"),
            record("3", "Tom Hanks"),
        ]
    }

    fn loaded(rules: &GameRules, rng: &mut StdRng) -> GameState {
        rules.apply_extraction(&GameState::default(), ExtractionResult::Success(roster()), rng)
    }

    fn with_current(state: GameState, name: &str) -> GameState {
        let current = state.roster.iter().find(|r| r.name == name).cloned();
        GameState { current, ..state }
    }

    #[test]
    fn test_success_starts_first_round() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(7);
        let state = loaded(&rules, &mut rng);

        assert_eq!(state.load_status, LoadStatus::Ready);
        assert_eq!(state.roster.len(), 3);
        assert_eq!(state.seen_ids.len(), 1);
        let current = state.current.as_ref().unwrap();
        assert!(state.seen_ids.contains(current.key()));
    }

    #[test]
    fn test_failure_and_empty_roster_are_errors() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(7);

        let failed = rules.apply_extraction(
            &GameState::default(),
            ExtractionResult::Failure("Page loading error: timeout".to_string()),
            &mut rng,
        );
        assert_eq!(failed.error(), Some("Page loading error: timeout"));
        assert!(failed.current.is_none());

        let empty = rules.apply_extraction(&GameState::default(), ExtractionResult::Success(vec![]), &mut rng);
        assert_eq!(empty.error(), Some(NOTHING_TO_SHOW));
    }

    #[test]
    fn test_pending_changes_nothing() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(7);
        let state = rules.apply_extraction(&GameState::default(), ExtractionResult::Pending, &mut rng);
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_advance_never_repeats_and_exhausts() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = loaded(&rules, &mut rng);
        let mut shown = vec![state.current.clone().unwrap().name];

        for _ in 1..3 {
            let before = state.seen_ids.clone();
            state = rules.advance_round(&state, &mut rng);
            let current = state.current.clone().unwrap();
            assert!(!before.contains(current.key()));
            shown.push(current.name);
        }

        shown.sort();
        assert_eq!(shown, ["Johnny Depp", "Penelope Cruz", "Tom Hanks"]);

        state = rules.advance_round(&state, &mut rng);
        assert!(state.is_exhausted());
        assert_eq!(state.load_status, LoadStatus::Exhausted(ALL_GUESSED.to_string()));
        assert!(state.current.is_none());
    }

    #[test]
    fn test_same_seed_same_order() {
        let rules = GameRules::default();
        let order = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = loaded(&rules, &mut rng);
            let mut names = Vec::new();
            while let Some(current) = state.current.clone() {
                names.push(current.name);
                state = rules.advance_round(&state, &mut rng);
            }
            names
        };
        assert_eq!(order(3), order(3));
    }

    #[test]
    fn test_advance_resets_round_fields() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = GameState {
            user_input: "tom".to_string(),
            suggestions: vec!["Tom Hanks".to_string()],
            revealed: true,
            outcome: GuessOutcome::Wrong,
            resolving: true,
            score: 4,
            attempts: 2,
            ..loaded(&rules, &mut rng)
        };

        let next = rules.advance_round(&state, &mut rng);
        assert_eq!(next.user_input, "");
        assert!(next.suggestions.is_empty());
        assert!(!next.revealed);
        assert_eq!(next.outcome, GuessOutcome::None);
        assert!(!next.resolving);
        assert_eq!((next.score, next.attempts), (4, 2));
    }

    #[test]
    fn test_update_input_suggestions() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = loaded(&rules, &mut rng);

        let typed = rules.update_input(&state, "dep");
        assert_eq!(typed.user_input, "dep");
        assert_eq!(typed.suggestions, ["Johnny Depp"]);
        assert_eq!(typed.current, state.current);

        let blank = rules.update_input(&typed, "   ");
        assert!(blank.suggestions.is_empty());
    }

    #[test]
    fn test_suggestions_are_capped() {
        let rules = GameRules::default();
        let roster = (0..8).map(|i| record(&i.to_string(), &format!("Actor {i}"))).collect();
        let state = GameState { roster, ..GameState::default() };

        let typed = rules.update_input(&state, "ACTOR");
        assert_eq!(typed.suggestions.len(), 5);
        assert_eq!(typed.suggestions[0], "Actor 0");
    }

    #[test]
    fn test_correct_guess_scores_and_schedules() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = with_current(loaded(&rules, &mut rng), "Johnny Depp");

        let transition = rules.submit_guess(&state, "  JOHNNY DEPP ");
        assert_eq!(transition.state.outcome, GuessOutcome::Correct);
        assert_eq!(transition.state.score, state.score + 1);
        assert_eq!(transition.state.user_input, "");
        assert!(transition.state.resolving);
        assert_eq!(transition.advance_after, Some(Duration::from_millis(1_500)));
    }

    #[test]
    fn test_wrong_guess_counts_attempt() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = with_current(loaded(&rules, &mut rng), "Johnny Depp");

        let transition = rules.submit_guess(&state, "wrong name");
        assert_eq!(transition.state.outcome, GuessOutcome::Wrong);
        assert_eq!(transition.state.attempts, state.attempts + 1);
        assert_eq!(transition.state.score, state.score);
        assert_eq!(transition.state.current, state.current);
        assert!(transition.state.round_active());
        assert_eq!(transition.advance_after, None);

        let blank = rules.submit_guess(&transition.state, "");
        assert_eq!(blank.state.attempts, state.attempts + 2);
    }

    #[test]
    fn test_give_up_reveals_and_schedules() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = rules.update_input(&loaded(&rules, &mut rng), "pen");

        let transition = rules.give_up(&state);
        assert!(transition.state.revealed);
        assert_eq!(transition.state.user_input, "");
        assert_eq!(transition.advance_after, Some(Duration::from_millis(2_500)));
    }

    #[test]
    fn test_resolved_round_ignores_further_events() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = with_current(loaded(&rules, &mut rng), "Tom Hanks");

        let resolved = rules.submit_guess(&state, "tom hanks").state;
        let again = rules.submit_guess(&resolved, "tom hanks");
        assert_eq!(again.state.score, resolved.score);
        assert_eq!(again.advance_after, None);

        let gave_up = rules.give_up(&resolved);
        assert!(!gave_up.state.revealed);
        assert_eq!(gave_up.advance_after, None);
    }

    #[test]
    fn test_guess_without_subject_is_ignored() {
        let rules = GameRules::default();
        let state = GameState::default();
        let transition = rules.submit_guess(&state, "anyone");
        assert_eq!(transition.state, state);
        assert_eq!(transition.advance_after, None);
    }

    #[test]
    fn test_reload_keeps_counters_and_clears_seen() {
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let state = GameState { score: 3, attempts: 5, ..loaded(&rules, &mut rng) };

        let loading = rules.begin_loading(&state);
        assert!(loading.is_loading());
        assert!(loading.seen_ids.is_empty());
        assert!(loading.current.is_none());
        assert_eq!((loading.score, loading.attempts), (3, 5));
    }
}
