//! Monotonic clock over the embassy time driver

use core::future::Future;

use chronoverse_core::traits::Clock;
use embassy_time::{with_timeout, Duration, Instant, Timer};

/// [`Clock`] backed by `embassy_time`
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn sleep_ms(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await
    }

    async fn timeout<F: Future>(&self, ms: u32, fut: F) -> Option<F::Output> {
        with_timeout(Duration::from_millis(u64::from(ms)), fut).await.ok()
    }
}
