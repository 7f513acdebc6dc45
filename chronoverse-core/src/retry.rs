//! Bounded retry with exponential backoff
//!
//! Connectivity and time sync are both "keep trying until it works or the
//! budget runs out". The policy lives here so it can be exercised against
//! a fake clock.

use crate::traits::Clock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Budget and backoff bounds for one bounded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RetryPolicy {
    /// Total time the operation may take before it is abandoned
    pub budget_ms: u32,
    /// First wait between attempts
    pub initial_backoff_ms: u32,
    /// Upper bound for the doubling wait
    pub max_backoff_ms: u32,
}

impl RetryPolicy {
    /// Default budget for bringing the network link up
    pub const CONNECT: Self = Self::new(30_000, 500, 4_000);

    /// Default budget for one clock synchronization
    pub const SYNC: Self = Self::new(10_000, 500, 2_000);

    pub const fn new(budget_ms: u32, initial_backoff_ms: u32, max_backoff_ms: u32) -> Self {
        Self {
            budget_ms,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Same backoff with a different total budget
    pub fn with_budget(self, budget_ms: u32) -> Self {
        Self { budget_ms, ..self }
    }
}

/// Backoff state for one bounded operation
#[derive(Debug, Clone)]
pub struct Backoff {
    deadline_ms: u64,
    next_ms: u32,
    max_ms: u32,
}

impl Backoff {
    /// Start the budget at `now_ms`
    pub fn start(policy: RetryPolicy, now_ms: u64) -> Self {
        Self {
            deadline_ms: now_ms.saturating_add(u64::from(policy.budget_ms)),
            next_ms: policy.initial_backoff_ms.max(1),
            max_ms: policy.max_backoff_ms.max(1),
        }
    }

    /// Budget left at `now_ms`
    pub fn remaining_ms(&self, now_ms: u64) -> u32 {
        u32::try_from(self.deadline_ms.saturating_sub(now_ms)).unwrap_or(u32::MAX)
    }

    /// Wait before the next attempt, or `None` once the budget is spent
    ///
    /// Delays double up to the policy maximum and are clamped so the last
    /// wait ends exactly at the deadline.
    pub fn next_delay(&mut self, now_ms: u64) -> Option<u32> {
        let remaining = self.remaining_ms(now_ms);
        if remaining == 0 {
            return None;
        }

        let delay = self.next_ms.min(remaining);
        self.next_ms = self.next_ms.saturating_mul(2).min(self.max_ms);
        Some(delay)
    }
}

/// Poll `ready` with backoff until it reports true or the budget runs out
///
/// Returns whether the condition was met.
pub async fn wait_until<C: Clock>(
    clock: &mut C,
    policy: RetryPolicy,
    mut ready: impl FnMut() -> bool,
) -> bool {
    let mut backoff = Backoff::start(policy, clock.now_ms());
    loop {
        if ready() {
            return true;
        }
        match backoff.next_delay(clock.now_ms()) {
            Some(delay) => clock.sleep_ms(delay).await,
            None => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeClock;
    use alloc::vec::Vec;
    use embassy_futures::block_on;

    #[test]
    fn test_backoff_doubles_to_max() {
        let mut backoff = Backoff::start(RetryPolicy::new(100_000, 500, 2_000), 0);
        let delays: Vec<u32> = (0..5).filter_map(|_| backoff.next_delay(0)).collect();
        assert_eq!(delays, [500, 1_000, 2_000, 2_000, 2_000]);
    }

    #[test]
    fn test_backoff_clamps_to_deadline() {
        let mut backoff = Backoff::start(RetryPolicy::new(1_200, 500, 4_000), 0);
        assert_eq!(backoff.next_delay(0), Some(500));
        assert_eq!(backoff.next_delay(500), Some(700));
        assert_eq!(backoff.next_delay(1_200), None);
    }

    #[test]
    fn test_zero_budget_never_waits() {
        let mut backoff = Backoff::start(RetryPolicy::new(0, 500, 4_000), 10);
        assert_eq!(backoff.next_delay(10), None);
    }

    #[test]
    fn test_wait_until_succeeds_after_polls() {
        let mut clock = FakeClock::new();
        let mut polls = 0;
        let met = block_on(wait_until(&mut clock, RetryPolicy::CONNECT, || {
            polls += 1;
            polls == 3
        }));
        assert!(met);
        assert_eq!(clock.sleeps, [500, 1_000]);
    }

    #[test]
    fn test_wait_until_gives_up_at_budget() {
        let mut clock = FakeClock::new();
        let met = block_on(wait_until(&mut clock, RetryPolicy::SYNC, || false));
        assert!(!met);
        // Never sleeps past the budget
        assert_eq!(clock.now_ms(), 10_000);
    }
}
