//! The refresh loop
//!
//! Boot: bring the link up, sync, show the first refresh (or the
//! "no time" notice), then wait for the next minute boundary.
//!
//! Each steady-state cycle, in order:
//! 1. Read and freeze the time
//! 2. Reconnect if a sync is due and the link is down (once per hour)
//! 3. Hourly sync check; a successful sync gets an extra refresh
//! 4. Resolve content for the frozen time
//! 5. Present it unless there is nothing to show
//! 6. Size the sleep as cadence minus the time the cycle took

use crate::config::{DeviceConfig, RetryConfig, ScheduleConfig, WifiConfig};
use crate::payload::DisplayPayload;
use crate::resolver::ContentResolver;
use crate::retry::{wait_until, Backoff};
use crate::sync::{ClockSynchronizer, SyncOutcome};
use crate::time::Timestamp;
use crate::traits::{Clock, ContentStore, DisplaySurface, LinkError, NetworkLink, TimeSource};

use super::report::{BootReport, CycleReport, Presentation, RefreshReport, ReportSink};
use super::timing::{alignment_delay, sleep_interval};

/// Top-level control loop
///
/// Owns every collaborator. The cache and sync state live inside the
/// resolver and synchronizer; the scheduler itself keeps only timing
/// settings.
pub struct RefreshScheduler<C, L, T, S, D> {
    clock: C,
    link: L,
    sync: ClockSynchronizer<T>,
    resolver: ContentResolver<S>,
    surface: D,
    wifi: WifiConfig,
    schedule: ScheduleConfig,
    retry: RetryConfig,
}

impl<C, L, T, S, D> RefreshScheduler<C, L, T, S, D>
where
    C: Clock,
    L: NetworkLink,
    T: TimeSource,
    S: ContentStore,
    D: DisplaySurface,
{
    pub fn new(clock: C, link: L, time: T, store: S, surface: D, config: &DeviceConfig) -> Self {
        Self {
            clock,
            link,
            sync: ClockSynchronizer::new(
                time,
                config.schedule.link_down_policy,
                config.retry.sync,
            ),
            resolver: ContentResolver::new(store),
            surface,
            wifi: config.wifi.clone(),
            schedule: config.schedule,
            retry: config.retry,
        }
    }

    pub fn synchronizer(&self) -> &ClockSynchronizer<T> {
        &self.sync
    }

    pub fn resolver(&self) -> &ContentResolver<S> {
        &self.resolver
    }

    /// Boot once, then run cycles forever
    pub async fn run<R: ReportSink>(&mut self, sink: &mut R) -> ! {
        let boot = self.boot().await;
        sink.boot(&boot);
        self.align(&boot).await;

        loop {
            let report = self.run_cycle().await;
            sink.cycle(&report);
            self.clock.sleep_ms(report.sleep_ms).await;
        }
    }

    /// Connect, sync, and show the first screen
    ///
    /// The returned report carries the alignment wait; call
    /// [`align`](Self::align) with it before the first cycle.
    pub async fn boot(&mut self) -> BootReport {
        let started = self.clock.now_ms();

        let connect = self.connect().await;
        let sync = if self.link.is_connected() {
            Some(self.sync.sync_now(&mut self.clock).await)
        } else {
            None
        };

        let read_at = self.clock.now_ms();
        let time = self.sync.now();
        let (first_refresh, notice, alignment_ms) = match time {
            Ok(timestamp) => {
                self.sync.mark_synced(timestamp.hour());
                let refresh = self.refresh(&timestamp).await;
                let alignment = alignment_delay(
                    timestamp.millis_until_next_minute(),
                    self.clock.elapsed_since(read_at),
                    self.schedule.settle_margin_ms,
                );
                (Some(refresh), None, alignment)
            }
            Err(_) => {
                let notice = self.present(&DisplayPayload::time_unavailable()).await;
                (None, Some(notice), 0)
            }
        };

        BootReport {
            connect,
            sync,
            time,
            first_refresh,
            notice,
            spent_ms: self.clock.elapsed_since(started),
            alignment_ms,
        }
    }

    /// Wait out the boot alignment
    pub async fn align(&mut self, boot: &BootReport) {
        if boot.alignment_ms > 0 {
            self.clock.sleep_ms(boot.alignment_ms).await;
        }
    }

    /// One steady-state cycle, without the trailing sleep
    pub async fn run_cycle(&mut self) -> CycleReport {
        let started = self.clock.now_ms();
        let time = self.sync.now();
        let mut report = CycleReport::new(time);

        match time {
            Ok(frozen) => self.timed_cycle(frozen, &mut report).await,
            Err(_) if self.schedule.recover_when_unsynced => self.recover(&mut report).await,
            Err(_) => {}
        }

        report.elapsed_ms = self.clock.elapsed_since(started);
        report.sleep_ms = sleep_interval(self.schedule.cadence_ms, report.elapsed_ms);
        report
    }

    async fn timed_cycle(&mut self, frozen: Timestamp, report: &mut CycleReport) {
        let hour = frozen.hour();
        let mut link_up = self.link.is_connected();

        if self.sync.should_reconnect(hour, link_up) {
            self.sync.mark_reconnect(hour);
            report.reconnect = Some(self.connect().await);
            link_up = self.link.is_connected();
        }

        let outcome = self.sync.maybe_sync(&mut self.clock, hour, link_up).await;
        report.sync = Some(outcome);

        let mut frozen = frozen;
        if outcome == SyncOutcome::Succeeded {
            // Refreeze on the corrected clock
            if let Ok(corrected) = self.sync.now() {
                if corrected.hour() != hour {
                    self.sync.mark_synced(corrected.hour());
                }
                frozen = corrected;
            }
            report.extra_refresh = Some(self.refresh(&frozen).await);
        }

        report.refresh = Some(self.refresh(&frozen).await);
    }

    /// Try to get a time at all: reconnect if needed, then one bounded sync
    async fn recover(&mut self, report: &mut CycleReport) {
        if !self.link.is_connected() {
            report.reconnect = Some(self.connect().await);
            if !self.link.is_connected() {
                return;
            }
        }

        let result = self.sync.sync_now(&mut self.clock).await;
        report.recovery = Some(result);
        if result.is_err() {
            return;
        }

        if let Ok(timestamp) = self.sync.now() {
            self.sync.mark_synced(timestamp.hour());
            report.refresh = Some(self.refresh(&timestamp).await);
        }
    }

    /// Bring the link up within the connect budget
    ///
    /// Association attempts are retried with backoff until one is
    /// accepted; the remaining budget is then spent waiting for the link
    /// to report connected. An attempt still running at the deadline is
    /// abandoned.
    async fn connect(&mut self) -> Result<(), LinkError> {
        let policy = self.retry.connect;
        let mut backoff = Backoff::start(policy, self.clock.now_ms());

        loop {
            let remaining = backoff.remaining_ms(self.clock.now_ms());
            let attempt = self
                .clock
                .timeout(remaining, self.link.connect(&self.wifi))
                .await
                .unwrap_or(Err(LinkError::Timeout));
            if attempt.is_ok() {
                let rest = policy.with_budget(backoff.remaining_ms(self.clock.now_ms()));
                let link = &self.link;
                return if wait_until(&mut self.clock, rest, || link.is_connected()).await {
                    Ok(())
                } else {
                    Err(LinkError::Timeout)
                };
            }

            match backoff.next_delay(self.clock.now_ms()) {
                Some(delay) => self.clock.sleep_ms(delay).await,
                None => return attempt,
            }
        }
    }

    /// Resolve and present content for `timestamp`
    async fn refresh(&mut self, timestamp: &Timestamp) -> RefreshReport {
        let resolution = self.resolver.resolve(timestamp);
        let presentation = if resolution.payload.is_blank() {
            Presentation::Skipped
        } else {
            self.present(&resolution.payload).await
        };

        RefreshReport {
            time_text: resolution.payload.time_text,
            status: resolution.status,
            reloaded: resolution.reloaded,
            presentation,
        }
    }

    async fn present(&mut self, payload: &DisplayPayload) -> Presentation {
        match self.surface.present(payload).await {
            Ok(()) => Presentation::Shown,
            Err(e) => Presentation::Failed(e),
        }
    }
}
