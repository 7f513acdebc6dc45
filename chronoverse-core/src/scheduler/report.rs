//! Structured reports returned by the scheduler
//!
//! The core never logs. Each boot and cycle produces a report and the
//! firmware decides how to log it.

use heapless::Vec;

use crate::error::ErrorKind;
use crate::resolver::ResolveStatus;
use crate::sync::{SyncFault, SyncOutcome};
use crate::time::{TimeText, Timestamp};
use crate::traits::{LinkError, SurfaceError, TimeError};

/// What happened to a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Presentation {
    /// Sent to the surface and committed
    Shown,
    /// Nothing to show, the panel was left as it was
    Skipped,
    Failed(SurfaceError),
}

/// One resolve-and-present pass
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshReport {
    pub time_text: TimeText,
    pub status: ResolveStatus,
    /// The content store was read for this refresh
    pub reloaded: bool,
    pub presentation: Presentation,
}

/// Outcome of one steady-state cycle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Frozen timestamp for the cycle, or why none was available
    pub time: Result<Timestamp, TimeError>,
    /// Reconnect attempted before the sync check
    pub reconnect: Option<Result<(), LinkError>>,
    /// Hourly sync gate result (absent when the time was unavailable)
    pub sync: Option<SyncOutcome>,
    /// Sync attempted because the time was unavailable
    pub recovery: Option<Result<(), TimeError>>,
    /// Refresh made right after a successful sync
    pub extra_refresh: Option<RefreshReport>,
    pub refresh: Option<RefreshReport>,
    pub elapsed_ms: u32,
    pub sleep_ms: u32,
}

impl CycleReport {
    pub(crate) fn new(time: Result<Timestamp, TimeError>) -> Self {
        Self {
            time,
            reconnect: None,
            sync: None,
            recovery: None,
            extra_refresh: None,
            refresh: None,
            elapsed_ms: 0,
            sleep_ms: 0,
        }
    }

    /// Every error this cycle ran into, in the order they happened
    pub fn errors(&self) -> Vec<ErrorKind, 8> {
        let mut errors = Vec::new();
        if let Err(e) = self.time {
            let _ = errors.push(e.into());
        }
        if let Some(Err(e)) = self.reconnect {
            let _ = errors.push(e.into());
        }
        match self.sync {
            Some(SyncOutcome::Failed(SyncFault::LinkDown)) => {
                let _ = errors.push(ErrorKind::Connectivity);
            }
            Some(SyncOutcome::Failed(SyncFault::Time(e))) => {
                let _ = errors.push(e.into());
            }
            _ => {}
        }
        if let Some(Err(e)) = self.recovery {
            let _ = errors.push(e.into());
        }
        for refresh in [&self.extra_refresh, &self.refresh].into_iter().flatten() {
            refresh.push_errors(&mut errors);
        }
        errors
    }
}

impl RefreshReport {
    fn push_errors(&self, errors: &mut Vec<ErrorKind, 8>) {
        match self.status {
            ResolveStatus::Found => {}
            ResolveStatus::MissingEntry => {
                let _ = errors.push(ErrorKind::MissingEntry);
            }
            ResolveStatus::LoadFailed(e) => {
                let _ = errors.push(e.into());
            }
        }
        if let Presentation::Failed(e) = self.presentation {
            let _ = errors.push(e.into());
        }
    }
}

/// Outcome of the boot sequence
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    pub connect: Result<(), LinkError>,
    /// Initial sync (absent when the link never came up)
    pub sync: Option<Result<(), TimeError>>,
    pub time: Result<Timestamp, TimeError>,
    /// First refresh, made when the time is known
    pub first_refresh: Option<RefreshReport>,
    /// Notice shown when the time is unknown
    pub notice: Option<Presentation>,
    /// Time from power-on work start to the end of boot
    pub spent_ms: u32,
    /// Wait before the first steady-state cycle
    pub alignment_ms: u32,
}

/// Receiver for scheduler reports
pub trait ReportSink {
    fn boot(&mut self, report: &BootReport);
    fn cycle(&mut self, report: &CycleReport);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreError;

    fn refresh(status: ResolveStatus, presentation: Presentation) -> RefreshReport {
        RefreshReport {
            time_text: TimeText::new(),
            status,
            reloaded: false,
            presentation,
        }
    }

    #[test]
    fn test_clean_cycle_has_no_errors() {
        let mut report = CycleReport::new(Ok(Timestamp::new(5, 7, 0, 0).unwrap()));
        report.sync = Some(SyncOutcome::Skipped);
        report.refresh = Some(refresh(ResolveStatus::Found, Presentation::Shown));
        assert!(report.errors().is_empty());
    }

    #[test]
    fn test_errors_in_order() {
        let mut report = CycleReport::new(Ok(Timestamp::new(5, 7, 0, 0).unwrap()));
        report.reconnect = Some(Err(LinkError::Timeout));
        report.sync = Some(SyncOutcome::Failed(SyncFault::LinkDown));
        report.refresh = Some(refresh(
            ResolveStatus::LoadFailed(StoreError::Corrupt),
            Presentation::Skipped,
        ));
        assert_eq!(
            report.errors().as_slice(),
            &[
                ErrorKind::Connectivity,
                ErrorKind::Connectivity,
                ErrorKind::ContentLoad
            ]
        );
    }

    #[test]
    fn test_unavailable_time_reported() {
        let mut report = CycleReport::new(Err(TimeError::Unavailable));
        report.recovery = Some(Err(TimeError::Timeout));
        assert_eq!(
            report.errors().as_slice(),
            &[ErrorKind::TimeUnavailable, ErrorKind::SyncFailure]
        );
    }
}
