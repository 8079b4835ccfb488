//! Account pool with round-robin failover and persisted usage state.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::AccountConfig;

use super::account::AccountStatus;

/// Errors that can occur reading or writing the quota state file.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State file error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Per-account usage state as persisted on disk. API keys are never written;
/// they are supplied fresh from configuration on every run.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountState {
    pub used_today: u32,
    pub last_reset: DateTime<Utc>,
    pub is_exhausted: bool,
}

/// Result of comparing remaining quota against a required request count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityCheck {
    pub sufficient: bool,
    pub available: u32,
    pub required: u32,
    pub shortfall: u32,
}

/// Rotates across API accounts as daily quotas run out.
///
/// Rotation is strict round-robin in account list order. Whole-pool
/// exhaustion is a valid terminal state signalled by `None`, never an error.
pub struct AccountPool {
    accounts: Vec<AccountStatus>,
    current_index: usize,
    state_path: PathBuf,
}

impl AccountPool {
    /// Build a pool from validated account configs, loading any prior usage
    /// state from `state_path`. A missing or unreadable state file means
    /// fresh zeroed accounts.
    pub fn new(configs: &[AccountConfig], state_path: impl Into<PathBuf>) -> Self {
        let mut pool = Self {
            accounts: configs.iter().map(AccountStatus::new).collect(),
            current_index: 0,
            state_path: state_path.into(),
        };

        if let Err(e) = pool.load_state() {
            warn!("could not load quota state: {e}");
        }

        pool
    }

    pub fn accounts(&self) -> &[AccountStatus] {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut [AccountStatus] {
        &mut self.accounts
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Load usage counters from the state file. Accounts absent from the
    /// file keep their zeroed in-memory state.
    pub fn load_state(&mut self) -> Result<(), PoolError> {
        if !self.state_path.exists() {
            return Ok(());
        }

        let json = fs::read_to_string(&self.state_path)?;
        let state: HashMap<String, AccountState> = serde_json::from_str(&json)?;

        for acc in &mut self.accounts {
            if let Some(saved) = state.get(&acc.name) {
                acc.used_today = saved.used_today;
                acc.last_reset = saved.last_reset;
                acc.is_exhausted = saved.is_exhausted;

                // A reset may have come due while no process was running.
                acc.maybe_reset();
            }
        }

        Ok(())
    }

    /// Write usage counters to the state file, keyed by account name.
    pub fn save_state(&self) -> Result<(), PoolError> {
        let state: HashMap<&str, AccountState> = self
            .accounts
            .iter()
            .map(|acc| {
                (
                    acc.name.as_str(),
                    AccountState {
                        used_today: acc.used_today,
                        last_reset: acc.last_reset,
                        is_exhausted: acc.is_exhausted,
                    },
                )
            })
            .collect();

        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.state_path, serde_json::to_string_pretty(&state)?)?;

        Ok(())
    }

    // A state-file hiccup must never abort the caller's request flow.
    fn persist(&self) {
        if let Err(e) = self.save_state() {
            warn!("could not save quota state: {e}");
        }
    }

    /// First usable account in rotation order, starting from the cursor.
    /// Advances the cursor past unusable accounts. `None` means the whole
    /// pool is exhausted for now.
    pub fn current_account(&mut self) -> Option<&AccountStatus> {
        if self.accounts.is_empty() {
            return None;
        }

        for _ in 0..self.accounts.len() {
            if self.accounts[self.current_index].can_use() {
                return Some(&self.accounts[self.current_index]);
            }

            self.current_index = (self.current_index + 1) % self.accounts.len();
        }

        None
    }

    /// API key for the current usable account, if any.
    pub fn api_key(&mut self) -> Option<String> {
        self.current_account().map(|acc| acc.api_key.clone())
    }

    /// Whether any account can serve a request right now.
    pub fn has_capacity(&mut self) -> bool {
        self.accounts.iter_mut().any(|acc| acc.can_use())
    }

    /// Total remaining quota across all accounts, counting pending daily
    /// resets as already applied. Does not mutate any account.
    pub fn total_remaining_quota(&self) -> u32 {
        self.accounts.iter().map(|acc| acc.effective_remaining()).sum()
    }

    /// Compare remaining quota against a required request count. Read-only:
    /// calling this twice in a row yields identical results.
    pub fn check_capacity(&self, required: u32) -> CapacityCheck {
        let available = self.total_remaining_quota();

        CapacityCheck {
            sufficient: available >= required,
            available,
            required,
            shortfall: required.saturating_sub(available),
        }
    }

    /// Record a successful request on the current account and persist.
    pub fn mark_success(&mut self) {
        if let Some(acc) = self.accounts.get_mut(self.current_index) {
            acc.mark_used();
        }
        self.persist();
    }

    /// Record a failed request. A quota-exceeded failure marks the current
    /// account exhausted and rotates to the next one; state is persisted
    /// either way.
    pub fn mark_failure(&mut self, error_msg: &str, quota_exceeded: bool) {
        if quota_exceeded && !self.accounts.is_empty() {
            let acc = &mut self.accounts[self.current_index];
            acc.mark_exhausted(error_msg);
            warn!(account = %acc.name, "quota exhausted: {error_msg}");

            self.current_index = (self.current_index + 1) % self.accounts.len();
        }

        self.persist();
    }

    /// Formatted per-account quota report.
    pub fn status_summary(&self) -> String {
        let mut lines = Vec::new();
        lines.push("API Quota Status:".to_string());
        lines.push("=".repeat(60));

        let total_limit: u32 = self.accounts.iter().map(|a| a.daily_limit).sum();
        let total_used: u32 = self.accounts.iter().map(|a| a.used_today).sum();
        let total_remaining = self.total_remaining_quota();

        for acc in &self.accounts {
            let status = if acc.usable() { "[OK]" } else { "[X]" };
            let bar_length = 20;
            let used_bars = if acc.daily_limit > 0 {
                (acc.used_today as usize * bar_length) / acc.daily_limit as usize
            } else {
                0
            };
            let bar = format!(
                "{}{}",
                "#".repeat(used_bars.min(bar_length)),
                "-".repeat(bar_length - used_bars.min(bar_length))
            );

            lines.push(format!("{status} {}:", acc.name));
            lines.push(format!("   [{bar}] {}/{}", acc.used_today, acc.daily_limit));

            if acc.is_exhausted {
                lines.push(format!("   Resets in: {}", acc.time_until_reset()));
            }
        }

        lines.push("=".repeat(60));
        lines.push(format!(
            "Total: {total_used}/{total_limit} used, {total_remaining} remaining"
        ));

        if total_remaining == 0 && !self.accounts.is_empty() {
            let earliest = self
                .accounts
                .iter()
                .map(|a| a.time_until_reset())
                .min()
                .unwrap_or_default();
            lines.push(format!("All exhausted. Next reset in: {earliest}"));
        }

        lines.join("\n")
    }
}
