//! Logging of scheduler reports

use chronoverse_core::resolver::ResolveStatus;
use chronoverse_core::scheduler::{BootReport, CycleReport, Presentation, RefreshReport, ReportSink};
use chronoverse_core::sync::{SyncFault, SyncOutcome};
use log::{error, info, warn};

/// [`ReportSink`] that writes to the `log` facade
#[derive(Default)]
pub struct LogSink {
    cycles: u32,
}

impl ReportSink for LogSink {
    fn boot(&mut self, report: &BootReport) {
        match report.connect {
            Ok(()) => info!("wifi: link up"),
            Err(e) => warn!("wifi: link not established at boot: {:?}", e),
        }
        match report.sync {
            Some(Ok(())) => info!("sntp: initial sync done"),
            Some(Err(e)) => warn!("sntp: initial sync failed: {:?}", e),
            None => warn!("sntp: initial sync skipped, no link"),
        }
        match &report.time {
            Ok(ts) => info!("refresh: boot time {}", ts.time_text()),
            Err(e) => warn!("refresh: time unavailable at boot: {:?}", e),
        }
        if let Some(refresh) = &report.first_refresh {
            log_refresh(refresh);
        }
        match report.notice {
            Some(Presentation::Shown) => info!("panel: showing time-unavailable notice"),
            Some(Presentation::Failed(e)) => warn!("panel: notice not shown: {:?}", e),
            _ => {}
        }
        info!(
            "refresh: boot took {}ms, first cycle in {}ms",
            report.spent_ms, report.alignment_ms
        );
    }

    fn cycle(&mut self, report: &CycleReport) {
        self.cycles = self.cycles.wrapping_add(1);

        if let Some(reconnect) = report.reconnect {
            match reconnect {
                Ok(()) => info!("wifi: reconnected"),
                Err(e) => warn!("wifi: reconnect failed: {:?}", e),
            }
        }
        match report.sync {
            Some(SyncOutcome::Succeeded) => info!("sntp: hourly sync done"),
            Some(SyncOutcome::Failed(SyncFault::LinkDown)) => {
                warn!("sntp: hourly sync skipped, link down")
            }
            Some(SyncOutcome::Failed(SyncFault::Time(e))) => {
                warn!("sntp: hourly sync failed: {:?}", e)
            }
            Some(SyncOutcome::Skipped) | None => {}
        }
        match report.recovery {
            Some(Ok(())) => info!("sntp: recovered time"),
            Some(Err(e)) => warn!("sntp: recovery failed: {:?}", e),
            None => {}
        }
        for refresh in [&report.extra_refresh, &report.refresh].into_iter().flatten() {
            log_refresh(refresh);
        }

        let errors = report.errors();
        if errors.iter().any(|kind| kind.is_fatal()) {
            error!("refresh: cycle {} hit {:?}", self.cycles, errors.as_slice());
        } else if errors.is_empty() {
            info!(
                "refresh: cycle {} took {}ms, sleeping {}ms",
                self.cycles, report.elapsed_ms, report.sleep_ms
            );
        } else {
            warn!(
                "refresh: cycle {} took {}ms with {:?}, sleeping {}ms",
                self.cycles,
                report.elapsed_ms,
                errors.as_slice(),
                report.sleep_ms
            );
        }
    }
}

fn log_refresh(refresh: &RefreshReport) {
    let time = refresh.time_text.as_str();
    match refresh.status {
        ResolveStatus::Found if refresh.reloaded => info!("refresh: {} loaded new hour", time),
        ResolveStatus::Found => {}
        ResolveStatus::MissingEntry => warn!("refresh: {} has no entry", time),
        ResolveStatus::LoadFailed(e) => warn!("refresh: {} content load failed: {:?}", time, e),
    }
    match refresh.presentation {
        Presentation::Shown => info!("panel: showing {}", time),
        Presentation::Skipped => info!("panel: {} skipped, nothing to show", time),
        Presentation::Failed(e) => warn!("panel: {} not shown: {:?}", time, e),
    }
}
