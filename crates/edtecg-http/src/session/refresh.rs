//! Single-flight coordination for token refresh.
//!
//! The first caller to [`RefreshFlight::join`] becomes the leader and
//! performs the refresh; everyone arriving while it runs gets a waiter
//! receiver. Settling the flight clears the in-flight flag and drains the
//! waiter list under one lock, then hands the same outcome to each waiter in
//! the order they queued.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use edtecg_core::error::{AuthError, Error, TransportError};

/// What a refresh cycle ended with. Shared verbatim with every waiter.
pub(crate) type Outcome = Result<(), Error>;

#[derive(Debug, Default)]
pub(crate) struct RefreshFlight {
    state: Mutex<FlightState>,
}

#[derive(Debug, Default)]
struct FlightState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Outcome>>,
    last_failure: Option<Error>,
}

/// Role assigned by [`RefreshFlight::join`].
pub(crate) enum Ticket<'a> {
    /// Run the refresh, then settle the guard.
    Leader(FlightGuard<'a>),
    /// Wait for the leader's outcome.
    Waiter(oneshot::Receiver<Outcome>),
}

impl RefreshFlight {
    fn lock(&self) -> MutexGuard<'_, FlightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn join(&self) -> Ticket<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Ticket::Waiter(rx)
        } else {
            state.in_flight = true;
            Ticket::Leader(FlightGuard {
                flight: self,
                settled: false,
            })
        }
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    /// Error of the most recent cycle, if it failed.
    pub(crate) fn last_failure(&self) -> Option<Error> {
        self.lock().last_failure.clone()
    }

    #[cfg(test)]
    fn waiter_count(&self) -> usize {
        self.lock().waiters.len()
    }

    fn settle(&self, outcome: Outcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            state.last_failure = outcome.as_ref().err().cloned();
            std::mem::take(&mut state.waiters)
        };

        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose caller was dropped has nobody to tell.
            let _ = waiter.send(outcome.clone());
        }
        count
    }

    /// Wait for a leader's outcome.
    pub(crate) async fn wait(rx: oneshot::Receiver<Outcome>) -> Outcome {
        rx.await.unwrap_or_else(|_| Err(cancelled()))
    }
}

/// Leadership of one refresh cycle.
///
/// Dropping an unsettled guard (leader cancelled or panicked) still clears the
/// in-flight flag and fails every waiter.
pub(crate) struct FlightGuard<'a> {
    flight: &'a RefreshFlight,
    settled: bool,
}

impl FlightGuard<'_> {
    /// Release all waiters with `outcome`. Returns how many were waiting.
    pub(crate) fn settle(mut self, outcome: Outcome) -> usize {
        self.settled = true;
        self.flight.settle(outcome)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.flight.settle(Err(cancelled()));
        }
    }
}

fn cancelled() -> Error {
    Error::Auth(AuthError::RefreshFailed(Box::new(Error::Transport(
        TransportError::Cancelled,
    ))))
}
