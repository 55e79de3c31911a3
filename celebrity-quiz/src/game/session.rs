use crate::extractor::Extractor;
use crate::game::rules::{GameRules, Transition};
use crate::game::timer::RoundTimer;
use crate::types::{GameState, LoadStatus, SourceConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// A single quiz session.
///
/// Cloning yields another handle to the same session. Every operation
/// publishes a complete new [`GameState`] through a watch channel, so
/// observers never see a partially applied update. The session is bound to
/// a tokio runtime when it is created; delayed round advances run there, so
/// the synchronous operations can be called from any thread.
#[derive(Clone)]
pub struct GameSession {
    shared: Arc<Shared>,
}

struct Shared {
    id: Uuid,
    extractor: Extractor,
    source_url: String,
    base_url: String,
    rules: GameRules,
    state: watch::Sender<GameState>,
    inner: Mutex<Inner>,
}

struct Inner {
    rng: StdRng,
    timer: RoundTimer,
    /// Bumped by every (re)load; work started under an older epoch is dropped.
    epoch: u64,
}

impl GameSession {
    pub fn new(extractor: Extractor, source: &SourceConfig, rules: GameRules) -> Self {
        Self::with_rng(extractor, source, rules, StdRng::from_os_rng())
    }

    /// Session whose round order is fully determined by `rng`.
    ///
    /// Binds to the current tokio runtime; use [`GameSession::on_runtime`]
    /// when constructing from outside one.
    pub fn with_rng(extractor: Extractor, source: &SourceConfig, rules: GameRules, rng: StdRng) -> Self {
        Self::on_runtime(extractor, source, rules, rng, Handle::current())
    }

    pub fn on_runtime(
        extractor: Extractor,
        source: &SourceConfig,
        rules: GameRules,
        rng: StdRng,
        runtime: Handle,
    ) -> Self {
        let (state, _) = watch::channel(GameState::default());
        let id = Uuid::new_v4();
        info!("Created game session {} for {}", id, source.source_url);

        Self {
            shared: Arc::new(Shared {
                id,
                extractor,
                source_url: source.source_url.clone(),
                base_url: source.base_url.clone(),
                rules,
                state,
                inner: Mutex::new(Inner {
                    rng,
                    timer: RoundTimer::new(runtime),
                    epoch: 0,
                }),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn snapshot(&self) -> GameState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.shared.state.subscribe()
    }

    /// Loads the roster and starts the first round.
    ///
    /// Cancels any pending round advance. If another reload starts before
    /// this one's fetch completes, this result is discarded.
    pub async fn start_or_reload(&self) -> GameState {
        let span = info_span!("reload", session = %self.shared.id);
        let epoch = {
            let _enter = span.enter();
            let mut inner = self.shared.lock();
            inner.epoch += 1;
            if inner.timer.cancel() {
                info!("Dropped pending round advance for reload");
            }
            let loading = self.shared.rules.begin_loading(&self.snapshot());
            self.shared.publish(loading);
            inner.epoch
        };

        let result = self
            .shared
            .extractor
            .extract(&self.shared.source_url, &self.shared.base_url)
            .await;

        let _enter = span.enter();
        let mut inner = self.shared.lock();
        // A newer reload owns the state now.
        if inner.epoch != epoch {
            info!("Discarding extraction superseded by a newer reload");
            return self.snapshot();
        }
        let next = self
            .shared
            .rules
            .apply_extraction(&self.snapshot(), result, &mut inner.rng);
        self.shared.publish(next)
    }

    /// Moves to the next subject right away, dropping any pending advance.
    ///
    /// Does nothing while loading or after a failed load.
    pub fn advance_round(&self) -> GameState {
        let mut inner = self.shared.lock();
        let state = self.snapshot();
        if matches!(state.load_status, LoadStatus::Loading | LoadStatus::Error(_)) {
            debug!(session = %self.shared.id, "No roster to advance through");
            return state;
        }
        inner.timer.cancel();
        let next = self.shared.rules.advance_round(&state, &mut inner.rng);
        self.shared.publish(next)
    }

    pub fn update_input(&self, text: &str) -> GameState {
        let _inner = self.shared.lock();
        let next = self.shared.rules.update_input(&self.snapshot(), text);
        self.shared.publish(next)
    }

    pub fn submit_guess(&self, text: &str) -> GameState {
        let mut inner = self.shared.lock();
        let transition = self.shared.rules.submit_guess(&self.snapshot(), text);
        debug!(session = %self.shared.id, "Guess {:?}: {:?}", text, transition.state.outcome);
        self.apply(&mut inner, transition)
    }

    pub fn give_up(&self) -> GameState {
        let mut inner = self.shared.lock();
        let transition = self.shared.rules.give_up(&self.snapshot());
        self.apply(&mut inner, transition)
    }

    fn apply(&self, inner: &mut Inner, transition: Transition) -> GameState {
        if let Some(delay) = transition.advance_after {
            // The timer remembers which load it belongs to.
            let epoch = inner.epoch;
            let weak = Arc::downgrade(&self.shared);
            inner.timer.schedule(delay, move || Shared::advance_from_timer(weak, epoch));
        }
        self.shared.publish(transition.state)
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: GameState) -> GameState {
        self.state.send_replace(state.clone());
        state
    }

    fn advance_from_timer(shared: Weak<Shared>, epoch: u64) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut inner = shared.lock();
        let current = shared.state.borrow().clone();
        // Reloaded, or already advanced by hand.
        if inner.epoch != epoch || !current.resolving {
            debug!(session = %shared.id, "Ignoring stale round advance");
            return;
        }
        let next = shared.rules.advance_round(&current, &mut inner.rng);
        shared.publish(next);
    }
}
