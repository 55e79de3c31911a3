use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Runs one callback after a delay. At most one callback is pending; a new
/// `schedule` replaces the old one, and dropping the timer cancels it.
///
/// Callbacks run on the runtime the timer was bound to, so `schedule` may be
/// called from threads that are not part of any runtime.
#[derive(Debug)]
pub struct RoundTimer {
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl RoundTimer {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime, pending: None }
    }

    /// Binds to the runtime the caller is running on.
    ///
    /// Panics outside a tokio runtime context.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn schedule<F>(&mut self, after: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        debug!("Scheduling round advance in {:?}", after);
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            callback();
        }));
    }

    /// Returns whether a callback was still waiting to fire.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                debug!("Cancelled pending round advance");
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
