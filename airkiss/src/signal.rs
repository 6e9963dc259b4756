//! One-shot completion signalling for the decoder.
//!
//! A decoder completes at most once; consumers hold a cloned [`DoneSignal`]
//! and either poll it between observations or block on it with a timeout.
//! The signal fires exactly once, on the transition to the terminal state,
//! and must be tolerated to never fire at all (liveness comes from the
//! caller's wall-clock timeout).

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

#[derive(Debug)]
struct SignalInner {
    fired: Mutex<bool>,
    cond: Condvar,
}

/// A clonable, edge-triggered, single-fire completion handle.
#[derive(Debug, Clone)]
pub struct DoneSignal {
    inner: Arc<SignalInner>,
}

impl DoneSignal {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                fired: Mutex::new(false),
                cond: Condvar::new(),
            }),
        }
    }

    /// Fires the signal. Subsequent calls are no-ops.
    pub(crate) fn fire(&self) {
        let mut fired = self.inner.fired.lock().unwrap();
        if !*fired {
            *fired = true;
            self.inner.cond.notify_all();
        }
    }

    /// Non-blocking check of whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        *self.inner.fired.lock().unwrap()
    }

    /// Blocks until the signal fires or `timeout` elapses.
    ///
    /// # Returns
    /// `true` if the signal fired, `false` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let fired = self.inner.fired.lock().unwrap();
        let (fired, _result) = self
            .inner
            .cond
            .wait_timeout_while(fired, timeout, |fired| !*fired)
            .unwrap();
        *fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_unfired() {
        let signal = DoneSignal::new();
        assert!(!signal.is_fired());
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn fire_is_visible_to_clones() {
        let signal = DoneSignal::new();
        let observer = signal.clone();
        signal.fire();
        assert!(observer.is_fired());
        assert!(observer.wait_timeout(Duration::from_millis(0)));
    }

    #[test]
    fn fire_twice_is_noop() {
        let signal = DoneSignal::new();
        signal.fire();
        signal.fire();
        assert!(signal.is_fired());
    }

    #[test]
    fn wait_unblocks_on_fire_from_other_thread() {
        let signal = DoneSignal::new();
        let firer = signal.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            firer.fire();
        });
        assert!(signal.wait_timeout(Duration::from_secs(5)));
        handle.join().unwrap();
    }
}
