//! Clock synchronizer
//!
//! Wraps the time source and makes at most one sync attempt per observed
//! hour. A failed attempt still consumes the hour, so a flaky server
//! cannot cause a retry storm; the next hour tries again.

use crate::config::LinkDownPolicy;
use crate::retry::{Backoff, RetryPolicy};
use crate::time::Timestamp;
use crate::traits::{Clock, TimeError, TimeSource};

/// Hours in which sync and reconnect were last attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncState {
    /// Hour of day of the last sync attempt (None if never)
    pub last_synced_hour: Option<u8>,
    /// Hour of day of the last reconnect attempt (None if never)
    pub last_reconnect_hour: Option<u8>,
}

/// Why a sync attempt did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncFault {
    /// The link was down, so no exchange was attempted
    LinkDown,
    /// The exchange failed within its budget
    Time(TimeError),
}

/// Result of [`ClockSynchronizer::maybe_sync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// This hour was already attempted
    Skipped,
    Succeeded,
    Failed(SyncFault),
}

/// Hourly synchronization gate around a [`TimeSource`]
pub struct ClockSynchronizer<T> {
    source: T,
    state: SyncState,
    link_down: LinkDownPolicy,
    retry: RetryPolicy,
}

impl<T: TimeSource> ClockSynchronizer<T> {
    pub fn new(source: T, link_down: LinkDownPolicy, retry: RetryPolicy) -> Self {
        Self {
            source,
            state: SyncState::default(),
            link_down,
            retry,
        }
    }

    /// Current local time from the wrapped source
    pub fn now(&self) -> Result<Timestamp, TimeError> {
        self.source.now()
    }

    /// The wrapped time source
    pub fn source(&self) -> &T {
        &self.source
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn last_synced_hour(&self) -> Option<u8> {
        self.state.last_synced_hour
    }

    /// Record that `hour` has had its sync
    pub fn mark_synced(&mut self, hour: u8) {
        self.state.last_synced_hour = Some(hour);
    }

    /// Whether a reconnect should precede the sync check for `hour`
    ///
    /// True only when a sync is due, the link is down, and no reconnect
    /// was tried in this hour yet.
    pub fn should_reconnect(&self, hour: u8, link_up: bool) -> bool {
        !link_up
            && self.state.last_synced_hour != Some(hour)
            && self.state.last_reconnect_hour != Some(hour)
    }

    pub fn mark_reconnect(&mut self, hour: u8) {
        self.state.last_reconnect_hour = Some(hour);
    }

    /// Sync once per distinct hour value
    ///
    /// With the link down nothing is sent; whether the hour is consumed
    /// depends on the configured [`LinkDownPolicy`]. With the link up the
    /// hour is consumed whatever the exchange's result.
    pub async fn maybe_sync<C: Clock>(
        &mut self,
        clock: &mut C,
        hour: u8,
        link_up: bool,
    ) -> SyncOutcome {
        if self.state.last_synced_hour == Some(hour) {
            return SyncOutcome::Skipped;
        }

        if !link_up {
            if self.link_down == LinkDownPolicy::ConsumeHour {
                self.mark_synced(hour);
            }
            return SyncOutcome::Failed(SyncFault::LinkDown);
        }

        let result = self.sync_now(clock).await;
        self.mark_synced(hour);
        match result {
            Ok(()) => SyncOutcome::Succeeded,
            Err(e) => SyncOutcome::Failed(SyncFault::Time(e)),
        }
    }

    /// Run sync exchanges with backoff until one succeeds or the budget
    /// is spent
    ///
    /// Each exchange is cut off at the budget's deadline, so the whole
    /// call never outlasts the budget. Leaves [`SyncState`] untouched.
    pub async fn sync_now<C: Clock>(&mut self, clock: &mut C) -> Result<(), TimeError> {
        let mut backoff = Backoff::start(self.retry, clock.now_ms());
        loop {
            let remaining = backoff.remaining_ms(clock.now_ms());
            let attempt = clock
                .timeout(remaining, self.source.sync())
                .await
                .unwrap_or(Err(TimeError::Timeout));
            match attempt {
                Ok(()) => return Ok(()),
                Err(e) => match backoff.next_delay(clock.now_ms()) {
                    Some(delay) => clock.sleep_ms(delay).await,
                    None => return Err(e),
                },
            }
        }
    }
}
