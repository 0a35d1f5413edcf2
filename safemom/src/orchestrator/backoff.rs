use std::time::Duration;

use rand::Rng;

/// Exponential delay before retry number `retry + 1`: `base_ms * 2^retry`.
///
/// Saturates instead of overflowing for very large retry counts.
#[must_use]
pub fn backoff_delay_ms(base_ms: u64, retry: u32) -> u64 {
    let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor)
}

/// Add up to `jitter_percent` of `base_ms` on top of it. Never returns less than `base_ms`.
pub fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    if jitter_percent == 0 {
        return base_ms;
    }
    let jitter_range = std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100);
    let mut rng = rand::rng();
    base_ms.saturating_add(rng.random_range(0..jitter_range))
}

/// Full wait before the next attempt after `retry` retries have been consumed.
#[must_use]
pub fn retry_wait(base_ms: u64, retry: u32, jitter_percent: u8) -> Duration {
    Duration::from_millis(jitter_wait(
        backoff_delay_ms(base_ms, retry),
        u32::from(jitter_percent),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_per_retry() {
        assert_eq!(backoff_delay_ms(1000, 0), 1000);
        assert_eq!(backoff_delay_ms(1000, 1), 2000);
        assert_eq!(backoff_delay_ms(1000, 2), 4000);
    }

    #[test]
    fn saturates_on_overflow() {
        assert_eq!(backoff_delay_ms(1000, 80), u64::MAX);
        assert_eq!(backoff_delay_ms(u64::MAX, 3), u64::MAX);
    }

    #[test]
    fn zero_jitter_is_identity() {
        assert_eq!(retry_wait(250, 1, 0), Duration::from_millis(500));
    }
}
