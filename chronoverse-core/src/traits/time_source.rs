//! Wall-clock time source trait

use crate::time::Timestamp;

/// Errors from the time source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// No successful sync has happened yet
    Unavailable,
    /// The server did not answer in time
    Timeout,
    /// The request could not be sent (socket, DNS)
    Network,
    /// The reply was malformed or unsynchronized
    Protocol,
}

/// Network-synchronized wall clock
pub trait TimeSource {
    /// Perform one synchronization exchange
    ///
    /// Implementations bound a single exchange internally. Retrying across
    /// a budget is the caller's business.
    fn sync(&mut self) -> impl core::future::Future<Output = Result<(), TimeError>>;

    /// Current local time, or [`TimeError::Unavailable`] before the first
    /// successful sync
    fn now(&self) -> Result<Timestamp, TimeError>;
}
