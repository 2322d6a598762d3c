//! Tiered refresh scheduling policy.
//!
//! The buffer (how long before expiry a refresh fires) scales with remaining
//! token lifetime:
//!
//! - already expired: refresh immediately;
//! - under one minute left: skip proactive refresh and leave it to the
//!   reactive 401 path, so a fast-expiring token is not refreshed every few
//!   seconds under heavy polling;
//! - ten minutes or more left: fixed 60s buffer;
//! - in between: refresh at 75% of remaining lifetime, leaving a safety
//!   margin if the refresh itself fails.

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Below this TTL, proactive scheduling is skipped entirely.
pub const MIN_PROACTIVE_TTL_MS: i64 = 60_000;
/// At or above this TTL, the buffer is fixed at [`LONG_TTL_BUFFER_MS`].
pub const LONG_TTL_MS: i64 = 600_000;
/// Fixed buffer for long-lived tokens.
pub const LONG_TTL_BUFFER_MS: i64 = 60_000;

/// Outcome of a scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// No timer: the reactive 401 path covers this token.
    Skip,
    /// Past the refresh threshold: refresh without waiting.
    Immediate,
    /// Arm a timer for this delay.
    After(StdDuration),
}

/// Buffer before expiry at which a refresh should fire, for a token with
/// `ttl` remaining. Only meaningful for TTLs at or above
/// [`MIN_PROACTIVE_TTL_MS`].
pub fn refresh_buffer(ttl: Duration) -> Duration {
    let ttl_ms = ttl.num_milliseconds();
    if ttl_ms >= LONG_TTL_MS {
        Duration::milliseconds(LONG_TTL_BUFFER_MS)
    } else {
        Duration::milliseconds(ttl_ms / 4)
    }
}

/// Decide what to do for a token with `ttl` remaining.
pub fn decide(ttl: Duration) -> RefreshDecision {
    let ttl_ms = ttl.num_milliseconds();
    if ttl_ms <= 0 {
        return RefreshDecision::Immediate;
    }
    if ttl_ms < MIN_PROACTIVE_TTL_MS {
        return RefreshDecision::Skip;
    }
    let delay_ms = ttl_ms - refresh_buffer(ttl).num_milliseconds();
    if delay_ms <= 0 {
        RefreshDecision::Immediate
    } else {
        RefreshDecision::After(StdDuration::from_millis(delay_ms as u64))
    }
}
