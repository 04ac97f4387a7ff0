//! Failed-login attempt tracking.
//!
//! Per-username consecutive-failure counters, kept in memory for the
//! lifetime of the process. A username whose counter reaches the configured
//! maximum is locked; a successful login resets it to zero. There is no
//! unlock short of restarting.

use std::collections::HashMap;

pub struct AttemptTracker {
    max_attempts: u32,
    failures: HashMap<String, u32>,
}

impl AttemptTracker {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            failures: HashMap::new(),
        }
    }

    /// Record one failed attempt and return the new count.
    pub fn record_failure(&mut self, username: &str) -> u32 {
        let count = self.failures.entry(username.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// A successful login clears the counter entirely.
    pub fn record_success(&mut self, username: &str) {
        self.failures.remove(username);
    }

    pub fn is_locked(&self, username: &str) -> bool {
        self.count(username) >= self.max_attempts
    }

    /// Attempts left before lockout, saturating at zero.
    pub fn remaining(&self, username: &str) -> u32 {
        self.max_attempts.saturating_sub(self.count(username))
    }

    fn count(&self, username: &str) -> u32 {
        self.failures.get(username).copied().unwrap_or(0)
    }
}
