//! Quota-aware API account pool.
//!
//! Hands out a usable account to callers making rate-limited external
//! calls, rotates round-robin as daily quotas run out, and persists usage
//! counters across process runs. Exhaustion of the whole pool is a normal
//! terminal state, not an error.

mod account;
mod manager;

pub use account::AccountStatus;
pub use manager::{AccountPool, AccountState, CapacityCheck, PoolError};
