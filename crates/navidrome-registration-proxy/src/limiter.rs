//! Per-client registration attempt limiter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The attempt was counted; `remaining` more fit in the current window.
    Admitted { remaining: u32 },
    /// The window is full until `retry_after` has passed.
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    opened_at: Instant,
    attempts: u32,
}

/// Fixed-window attempt counter keyed by client identity.
///
/// A client's window opens on its first attempt and admits `max_attempts`
/// attempts until `window` has elapsed. Check-and-count happens under one
/// lock, so concurrent attempts from the same client can never exceed the
/// limit.
#[derive(Clone)]
pub struct AttemptLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_attempts: u32,
    window: Duration,
}

impl AttemptLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_attempts: max_attempts.max(1),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit and count an attempt from `client`, or reject it.
    pub fn check(&self, client: &str) -> Admission {
        self.check_at(client, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    pub fn check_at(&self, client: &str, now: Instant) -> Admission {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        let entry = windows.entry(client.to_string()).or_insert(Window {
            opened_at: now,
            attempts: 0,
        });

        let elapsed = now.saturating_duration_since(entry.opened_at);
        if elapsed >= self.window {
            *entry = Window {
                opened_at: now,
                attempts: 0,
            };
        }

        if entry.attempts >= self.max_attempts {
            let retry_after = self
                .window
                .saturating_sub(now.saturating_duration_since(entry.opened_at));
            return Admission::Rejected { retry_after };
        }

        entry.attempts += 1;
        Admission::Admitted {
            remaining: self.max_attempts - entry.attempts,
        }
    }

    /// Report whether `client` would be admitted, without counting an attempt.
    pub fn peek(&self, client: &str) -> Admission {
        self.peek_at(client, Instant::now())
    }

    /// [`peek`](Self::peek) against an explicit clock reading.
    pub fn peek_at(&self, client: &str, now: Instant) -> Admission {
        let windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        let open = match windows.get(client) {
            Some(w) if now.saturating_duration_since(w.opened_at) < self.window => *w,
            _ => {
                return Admission::Admitted {
                    remaining: self.max_attempts,
                }
            }
        };

        if open.attempts >= self.max_attempts {
            let retry_after = self
                .window
                .saturating_sub(now.saturating_duration_since(open.opened_at));
            return Admission::Rejected { retry_after };
        }

        Admission::Admitted {
            remaining: self.max_attempts - open.attempts,
        }
    }

    /// Drop windows that have fully elapsed. Returns how many were removed.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();

        windows.retain(|_, w| now.saturating_duration_since(w.opened_at) < self.window);

        before - windows.len()
    }

    /// Number of clients with an open window.
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Spawn a task that prunes elapsed windows once per window length.
    pub fn spawn_pruner(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let period = limiter.window.max(Duration::from_secs(1));
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                let removed = limiter.prune_expired(Instant::now());
                if removed > 0 {
                    debug!("Pruned {} expired rate limit windows", removed);
                }
            }
        })
    }
}
