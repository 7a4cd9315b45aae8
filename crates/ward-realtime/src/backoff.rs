//! Reconnect backoff calculation.
//!
//! Delay for attempt `n` (zero-based) is
//! `min(base * 2^n + random(0..1000ms), 30_000ms)`. The ceiling and jitter
//! range are fixed by the reconnect policy; only the base interval and the
//! attempt limit are configurable.
//!
//! The randomness is split out so the math is testable: callers in
//! production use [`backoff_delay_ms`], tests use
//! [`backoff_delay_ms_with_jitter`] with an explicit jitter value.

use rand::Rng;

/// Fixed delay ceiling in milliseconds.
pub const RECONNECT_CEILING_MS: u64 = 30_000;
/// Exclusive upper bound of the additive jitter in milliseconds.
pub const JITTER_MAX_MS: u64 = 1000;

/// Backoff delay with an explicit jitter value.
pub fn backoff_delay_ms_with_jitter(attempt: u32, base_ms: u64, jitter_ms: u64) -> u64 {
    let exponential = base_ms.saturating_mul(1u64 << attempt.min(31));
    exponential
        .saturating_add(jitter_ms)
        .min(RECONNECT_CEILING_MS)
}

/// Backoff delay for a reconnect attempt, with random jitter applied.
pub fn backoff_delay_ms(attempt: u32, base_ms: u64) -> u64 {
    let jitter = rand::rng().random_range(0..JITTER_MAX_MS);
    backoff_delay_ms_with_jitter(attempt, base_ms, jitter)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_zero_is_base_plus_jitter() {
        assert_eq!(backoff_delay_ms_with_jitter(0, 3000, 0), 3000);
        assert_eq!(backoff_delay_ms_with_jitter(0, 3000, 999), 3999);
    }

    #[test]
    fn delay_doubles_per_attempt() {
        assert_eq!(backoff_delay_ms_with_jitter(1, 3000, 0), 6000);
        assert_eq!(backoff_delay_ms_with_jitter(2, 3000, 0), 12_000);
        assert_eq!(backoff_delay_ms_with_jitter(3, 3000, 0), 24_000);
    }

    #[test]
    fn delay_caps_at_ceiling() {
        assert_eq!(backoff_delay_ms_with_jitter(4, 3000, 0), RECONNECT_CEILING_MS);
        assert_eq!(backoff_delay_ms_with_jitter(10, 3000, 999), RECONNECT_CEILING_MS);
    }

    #[test]
    fn cap_applies_after_jitter() {
        // 29_500 + 800 would exceed the ceiling — the sum is capped.
        assert_eq!(
            backoff_delay_ms_with_jitter(0, 29_500, 800),
            RECONNECT_CEILING_MS
        );
    }

    #[test]
    fn huge_attempt_does_not_overflow() {
        assert_eq!(
            backoff_delay_ms_with_jitter(u32::MAX, u64::MAX, u64::MAX),
            RECONNECT_CEILING_MS
        );
    }

    #[test]
    fn random_delay_within_expected_window() {
        for _ in 0..100 {
            let delay = backoff_delay_ms(0, 3000);
            assert!((3000..3000 + JITTER_MAX_MS).contains(&delay));
        }
    }

    #[test]
    fn random_delay_respects_ceiling() {
        for attempt in 0..20 {
            assert!(backoff_delay_ms(attempt, 3000) <= RECONNECT_CEILING_MS);
        }
    }
}
