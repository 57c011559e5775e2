//! Run-to-completion delivery of queued events.

use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug)]
struct State<T> {
    pending: VecDeque<T>,
    draining: bool,
}

/// FIFO of events with at most one drainer at a time.
///
/// An event submitted while a drain is in progress (from a callback on
/// the draining thread or from another thread) is queued and delivered
/// by that drainer once the current event has been handed to everyone.
/// No lock is held while an event is delivered.
#[derive(Debug)]
pub(crate) struct SerialQueue<T> {
    state: Mutex<State<T>>,
}

impl<T> SerialQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                pending: VecDeque::new(),
                draining: false,
            }),
        }
    }

    /// Runs `make` under the queue lock and queues the event it returns.
    ///
    /// Events are queued in the order their `make` calls ran, so state
    /// updated inside `make` advances in the same order events are
    /// delivered. If no drain is in progress, the caller drains the
    /// queue with `deliver` before returning; otherwise the running
    /// drainer delivers the event with its own `deliver`. Returns whether
    /// an event was queued.
    pub(crate) fn submit<M, D>(&self, make: M, mut deliver: D) -> bool
    where
        M: FnOnce() -> Option<T>,
        D: FnMut(T),
    {
        {
            let mut state = self.state.lock();
            let Some(event) = make() else {
                return false;
            };
            state.pending.push_back(event);
            if state.draining {
                return true;
            }
            state.draining = true;
        }

        let _guard = DrainGuard(self);
        loop {
            let event = {
                let mut state = self.state.lock();
                match state.pending.pop_front() {
                    Some(event) => event,
                    None => {
                        state.draining = false;
                        return true;
                    }
                }
            };
            deliver(event);
        }
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }
}

/// Releases the drainer role if a delivery callback panics.
struct DrainGuard<'a, T>(&'a SerialQueue<T>);

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut state = self.0.state.lock();
            state.pending.clear();
            state.draining = false;
        }
    }
}
