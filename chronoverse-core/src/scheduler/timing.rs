//! Cycle timing arithmetic

use crate::time::MILLIS_PER_MINUTE;

/// Sleep that keeps cycles on the cadence after `elapsed_ms` of work
///
/// Never negative: a cycle that overran the cadence sleeps zero.
pub fn sleep_interval(cadence_ms: u32, elapsed_ms: u32) -> u32 {
    cadence_ms.saturating_sub(elapsed_ms)
}

/// Boot wait that lands the first steady-state cycle just after `:00`
///
/// `until_next_minute_ms` was measured when the time was read and
/// `spent_ms` has passed since. If boot work ran past that boundary the
/// wait targets the following one. `settle_ms` is added on top.
pub fn alignment_delay(until_next_minute_ms: u32, spent_ms: u32, settle_ms: u32) -> u32 {
    let to_boundary = if spent_ms <= until_next_minute_ms {
        until_next_minute_ms - spent_ms
    } else {
        let over = (spent_ms - until_next_minute_ms) % MILLIS_PER_MINUTE;
        if over == 0 {
            0
        } else {
            MILLIS_PER_MINUTE - over
        }
    };
    to_boundary.saturating_add(settle_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sleep_interval() {
        assert_eq!(sleep_interval(60, 5), 55);
        assert_eq!(sleep_interval(60, 65), 0);
        assert_eq!(sleep_interval(60_000, 0), 60_000);
    }

    #[test]
    fn test_alignment_delay() {
        assert_eq!(alignment_delay(10_000, 2_000, 1_000), 9_000);
        assert_eq!(alignment_delay(10_000, 10_000, 1_000), 1_000);
        // Overran by 5 s: wait for the next boundary
        assert_eq!(alignment_delay(10_000, 15_000, 1_000), 56_000);
        assert_eq!(alignment_delay(10_000, 70_000, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_sleep_never_exceeds_cadence(cadence in 1u32..600_000, elapsed in 0u32..1_000_000) {
            let sleep = sleep_interval(cadence, elapsed);
            prop_assert!(sleep <= cadence);
            if elapsed < cadence {
                prop_assert_eq!(sleep + elapsed, cadence);
            } else {
                prop_assert_eq!(sleep, 0);
            }
        }

        #[test]
        fn prop_alignment_bounded(until in 1u32..=60_000, spent in 0u32..300_000, settle in 0u32..5_000) {
            let wait = alignment_delay(until, spent, settle);
            prop_assert!(wait >= settle);
            prop_assert!(wait <= MILLIS_PER_MINUTE + settle);
            // The wait always ends on a minute boundary plus the margin
            let landing = (u64::from(spent) + u64::from(wait - settle)) as i64 - i64::from(until);
            prop_assert_eq!(landing.rem_euclid(i64::from(MILLIS_PER_MINUTE)), 0);
        }
    }
}
