use proptest::prelude::*;
use safemom::{backoff_delay_ms, jitter_wait, retry_wait};

proptest! {
    #[test]
    fn backoff_never_shrinks(base in 0u64..100_000, retry in 0u32..40) {
        prop_assert!(backoff_delay_ms(base, retry + 1) >= backoff_delay_ms(base, retry));
    }

    #[test]
    fn jitter_stays_within_its_band(base in 1u64..1_000_000, pct in 1u32..=100) {
        let waited = jitter_wait(base, pct);
        let band = std::cmp::max(1, base * u64::from(pct) / 100);
        prop_assert!(waited >= base);
        prop_assert!(waited < base + band);
    }

    #[test]
    fn retry_wait_without_jitter_is_exact(base in 0u64..10_000, retry in 0u32..8) {
        let wait = retry_wait(base, retry, 0);
        prop_assert_eq!(wait.as_millis(), u128::from(base) << retry);
    }
}
