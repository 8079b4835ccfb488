//! Per-account daily quota tracking.

use chrono::{DateTime, Duration, Utc};

use crate::config::AccountConfig;

/// Usage state for one API account.
///
/// The daily quota resets lazily: nothing fires on a timer, the elapsed-day
/// check runs whenever usability is queried. An exhausted account silently
/// becomes usable again the first time it is asked after a day has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountStatus {
    pub name: String,
    pub api_key: String,
    pub daily_limit: u32,
    pub used_today: u32,
    pub last_reset: DateTime<Utc>,
    pub is_exhausted: bool,
    pub last_error: Option<String>,
}

impl AccountStatus {
    pub fn new(config: &AccountConfig) -> Self {
        Self {
            name: config.name.clone(),
            api_key: config.api_key.clone(),
            daily_limit: config.daily_limit,
            used_today: 0,
            last_reset: Utc::now(),
            is_exhausted: false,
            last_error: None,
        }
    }

    /// Remaining quota for today.
    pub fn remaining(&self) -> u32 {
        self.daily_limit.saturating_sub(self.used_today)
    }

    fn reset_due(&self, now: DateTime<Utc>) -> bool {
        // Elapsed wall-clock days since the last reset, not a fixed UTC
        // midnight boundary. Reset timing drifts with query time.
        (now - self.last_reset).num_days() >= 1
    }

    /// Apply the daily reset if it has come due.
    pub(crate) fn maybe_reset(&mut self) {
        if self.reset_due(Utc::now()) {
            self.reset_daily_quota();
        }
    }

    /// Check whether this account can serve a request, applying the lazy
    /// daily reset first.
    pub fn can_use(&mut self) -> bool {
        self.maybe_reset();
        !self.is_exhausted && self.remaining() > 0
    }

    /// Non-mutating usability check for status reporting. Accounts whose
    /// reset has come due count as usable even before the reset is applied.
    pub fn usable(&self) -> bool {
        if self.reset_due(Utc::now()) {
            return true;
        }
        !self.is_exhausted && self.remaining() > 0
    }

    /// Remaining quota as it would be after any due reset, without mutating
    /// the account. Keeps capacity reports read-only.
    pub fn effective_remaining(&self) -> u32 {
        if self.reset_due(Utc::now()) {
            self.daily_limit
        } else {
            self.remaining()
        }
    }

    /// Zero the day's usage and clear the exhausted flag and last error.
    pub fn reset_daily_quota(&mut self) {
        self.used_today = 0;
        self.is_exhausted = false;
        self.last_error = None;
        self.last_reset = Utc::now();
    }

    /// Record one successful request.
    pub fn mark_used(&mut self) {
        self.used_today += 1;
        if self.used_today >= self.daily_limit {
            self.is_exhausted = true;
        }
    }

    /// Mark the account exhausted after a provider quota error.
    pub fn mark_exhausted(&mut self, error_msg: &str) {
        self.is_exhausted = true;
        self.last_error = Some(error_msg.to_string());
    }

    /// Human-readable time until the next daily reset, e.g. "13h 22m".
    pub fn time_until_reset(&self) -> String {
        let next_reset = self.last_reset + Duration::days(1);
        let seconds = (next_reset - Utc::now()).num_seconds().max(0);

        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
