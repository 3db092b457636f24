use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Process-wide quit flag with interruptible waits.
///
/// The polling loop sleeps between ticks with `pace` and between reconnect
/// attempts with `wait`, so a quit request from Ctrl+C or the key monitor
/// takes effect without finishing the current interval.
pub struct ShutdownSignal {
    triggered: AtomicBool,
    condvar: Condvar,
    mutex: Mutex<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            triggered: AtomicBool::new(false),
            condvar: Condvar::new(),
            mutex: Mutex::new(()),
        }
    }

    /// Request shutdown and wake every waiter.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless shutdown is requested first.
    ///
    /// Returns `true` if the wait ended because of shutdown.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        // A poisoned lock means another thread panicked mid-wait; stop.
        let Ok(guard) = self.mutex.lock() else {
            return true;
        };

        match self
            .condvar
            .wait_timeout_while(guard, duration, |_| !self.is_shutdown())
        {
            Ok((_, timeout)) => !timeout.timed_out(),
            Err(_) => true,
        }
    }

    /// Wait for the tick scheduled at `next_tick`, then schedule the one after.
    ///
    /// Ticks stay on a fixed cadence regardless of how long the work between
    /// them took. If the loop has fallen more than one interval behind, the
    /// missed ticks are dropped rather than run back to back. Returns `true`
    /// if shutdown was requested.
    pub fn pace(&self, next_tick: &mut Instant, interval: Duration) -> bool {
        if self.wait(next_tick.saturating_duration_since(Instant::now())) {
            return true;
        }

        *next_tick += interval;
        let now = Instant::now();
        if *next_tick < now {
            *next_tick = now + interval;
        }
        false
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
