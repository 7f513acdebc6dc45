//! Monotonic clock and sleep

use core::future::Future;

/// Monotonic time base used for elapsed-time compensation and backoff
///
/// `now_ms` must never go backwards. It is unrelated to wall-clock time,
/// which comes from the [`TimeSource`](super::TimeSource).
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (typically boot)
    fn now_ms(&self) -> u64;

    /// Suspend for `ms` milliseconds
    ///
    /// On the device this is where low-power waiting happens.
    fn sleep_ms(&mut self, ms: u32) -> impl Future<Output = ()>;

    /// Run `fut` for at most `ms` milliseconds
    ///
    /// Yields `None` when the limit passes first; `fut` is dropped at
    /// that point.
    fn timeout<F: Future>(&self, ms: u32, fut: F) -> impl Future<Output = Option<F::Output>>;

    /// Milliseconds elapsed since `start_ms`, saturating at `u32::MAX`
    fn elapsed_since(&self, start_ms: u64) -> u32 {
        u32::try_from(self.now_ms().saturating_sub(start_ms)).unwrap_or(u32::MAX)
    }
}
