//! Fire-and-forget request dispatch for the UI thread.
//!
//! Each request runs on its own worker thread and reports back over a
//! channel. The UI loop calls [`Dispatcher::drain`] every tick and applies
//! what came back, so the collection is only ever touched on the UI thread.
//! There is no queue and no cancellation; two requests for the same record
//! may complete in either order.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, error};

use super::{SyncOutcome, SyncRequest, execute};
use crate::api::UserBackend;
use crate::error::SyncError;

pub struct Dispatcher {
    backend: Arc<dyn UserBackend>,
    tx: Sender<SyncOutcome>,
    rx: Receiver<SyncOutcome>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn UserBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { backend, tx, rx, in_flight: 0 }
    }

    /// Requests sent but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, request: SyncRequest) {
        let label = request.label();
        let fallback = request.clone();
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        debug!(request = label, "dispatching");

        let spawned = thread::Builder::new()
            .name(format!("userdesk-{label}"))
            .spawn(move || {
                let outcome = execute(backend.as_ref(), request);
                // The receiver only goes away when the app is shutting down.
                let _ = tx.send(outcome);
            });
        self.in_flight += 1;

        if let Err(e) = spawned {
            error!(request = label, error = %e, "failed to spawn request worker");
            let outcome = SyncOutcome::failed(
                &fallback,
                SyncError::local(format!("could not start request: {e}")),
            );
            let _ = self.tx.send(outcome);
        }
    }

    /// Completed outcomes, in completion order. Never blocks.
    pub fn drain(&mut self) -> Vec<SyncOutcome> {
        let outcomes: Vec<SyncOutcome> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(outcomes.len());
        outcomes
    }

    /// Block up to `timeout` for the next outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<SyncOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(outcome)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::InMemoryBackend;
    use crate::model::UserDraft;
    use crate::sync::UserListSynchronizer;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn outcomes_arrive_over_the_channel() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut d = Dispatcher::new(backend.clone());
        d.dispatch(SyncRequest::Create(UserDraft::new("A", "a@x.com")));
        assert_eq!(d.in_flight(), 1);

        let outcome = d.wait(WAIT).expect("outcome");
        assert_eq!(d.in_flight(), 0);
        match outcome {
            SyncOutcome::Created(Ok(u)) => assert_eq!(u.name, "A"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn collection_untouched_until_applied() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut d = Dispatcher::new(backend.clone());
        let mut s = UserListSynchronizer::new();

        d.dispatch(SyncRequest::Create(UserDraft::new("A", "a@x.com")));
        d.dispatch(SyncRequest::Create(UserDraft::new("B", "b@x.com")));
        let mut outcomes = Vec::new();
        while outcomes.len() < 2 {
            outcomes.push(d.wait(WAIT).expect("outcome"));
        }
        // Server already has both, the mirror has neither.
        assert_eq!(backend.users().len(), 2);
        assert!(s.is_empty());

        for o in outcomes {
            s.apply(o);
        }
        assert_eq!(s.len(), 2);
        assert!(d.drain().is_empty());
    }
}
