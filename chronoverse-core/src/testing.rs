//! Hand-written collaborator fakes shared by the unit tests
//!
//! All fakes share one tick counter with [`FakeClock`], so work done by a
//! collaborator shows up as elapsed time in the scheduler.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::future::{ready, Future};

use crate::config::WifiConfig;
use crate::content::{ContentBucket, ContentEntry};
use crate::payload::DisplayPayload;
use crate::time::{HourKey, MinuteKey, Timestamp};
use crate::traits::{
    Clock, ContentStore, DisplaySurface, LinkError, NetworkLink, StoreError, SurfaceError,
    TimeError, TimeSource,
};

pub(crate) type Ticks = Rc<Cell<u64>>;

fn advance(ticks: &Ticks, ms: u64) {
    ticks.set(ticks.get() + ms);
}

/// Clock that jumps forward on sleep and records every sleep
pub(crate) struct FakeClock {
    pub ticks: Ticks,
    pub sleeps: Vec<u32>,
}

impl FakeClock {
    pub(crate) fn new() -> Self {
        Self {
            ticks: Rc::new(Cell::new(0)),
            sleeps: Vec::new(),
        }
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.ticks.get()
    }

    fn sleep_ms(&mut self, ms: u32) -> impl Future<Output = ()> {
        advance(&self.ticks, u64::from(ms));
        self.sleeps.push(ms);
        ready(())
    }

    /// Collaborators advance the ticks while they run; an overrun is cut
    /// back to the deadline, as if the work had been dropped there
    async fn timeout<F: Future>(&self, ms: u32, fut: F) -> Option<F::Output> {
        let deadline = self.ticks.get() + u64::from(ms);
        let output = fut.await;
        if self.ticks.get() > deadline {
            self.ticks.set(deadline);
            None
        } else {
            Some(output)
        }
    }
}

/// Link that comes up on connect when `accepts` is set
pub(crate) struct FakeLink {
    pub ticks: Ticks,
    pub up: bool,
    pub accepts: bool,
    pub connects: u32,
    pub connect_cost_ms: u64,
}

impl FakeLink {
    pub(crate) fn new(ticks: &Ticks) -> Self {
        Self {
            ticks: ticks.clone(),
            up: false,
            accepts: true,
            connects: 0,
            connect_cost_ms: 0,
        }
    }
}

impl NetworkLink for FakeLink {
    async fn connect(&mut self, _wifi: &WifiConfig) -> Result<(), LinkError> {
        self.connects += 1;
        advance(&self.ticks, self.connect_cost_ms);
        if self.accepts {
            self.up = true;
            Ok(())
        } else {
            Err(LinkError::Rejected)
        }
    }

    fn is_connected(&self) -> bool {
        self.up
    }
}

/// Time source that follows the shared ticks once synced
///
/// Tick 0 corresponds to `origin_s` seconds past local midnight.
pub(crate) struct FakeTimeSource {
    pub ticks: Ticks,
    pub origin_s: u64,
    pub synced: bool,
    pub results: VecDeque<Result<(), TimeError>>,
    pub syncs: u32,
    pub sync_cost_ms: u64,
}

impl FakeTimeSource {
    pub(crate) fn new(ticks: &Ticks, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            ticks: ticks.clone(),
            origin_s: u64::from(hour) * 3600 + u64::from(minute) * 60 + u64::from(second),
            synced: false,
            results: VecDeque::new(),
            syncs: 0,
            sync_cost_ms: 0,
        }
    }

    pub(crate) fn synced(mut self) -> Self {
        self.synced = true;
        self
    }
}

impl TimeSource for FakeTimeSource {
    async fn sync(&mut self) -> Result<(), TimeError> {
        self.syncs += 1;
        advance(&self.ticks, self.sync_cost_ms);
        let result = self.results.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.synced = true;
        }
        result
    }

    fn now(&self) -> Result<Timestamp, TimeError> {
        if !self.synced {
            return Err(TimeError::Unavailable);
        }
        let ticks = self.ticks.get();
        Ok(Timestamp::from_unix_seconds(
            self.origin_s + ticks / 1000,
            (ticks % 1000) as u16,
            0,
        ))
    }
}

/// Store that builds a one-entry bucket (minute 07) per hour and records
/// each load
///
/// The entry text names the hour it was built for.
pub(crate) struct CountingStore {
    pub loads: Vec<HourKey>,
    pub fail_next: usize,
    pub wrong_hour: bool,
}

impl CountingStore {
    pub(crate) fn new() -> Self {
        Self {
            loads: Vec::new(),
            fail_next: 0,
            wrong_hour: false,
        }
    }
}

impl ContentStore for CountingStore {
    fn load_bucket(&mut self, hour: HourKey) -> Result<ContentBucket, StoreError> {
        self.loads.push(hour);
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(StoreError::Io);
        }
        let key = if self.wrong_hour {
            HourKey::new(hour.get() % 24 + 1).ok_or(StoreError::Corrupt)?
        } else {
            hour
        };
        let mut bucket = ContentBucket::new(key);
        if let Some(minute) = MinuteKey::from_minute(7) {
            let text = format!("Verse for hour {:02}", key.get());
            bucket.insert(minute, ContentEntry::new("Psalm 23:1 (Psalms)", text));
        }
        Ok(bucket)
    }
}

/// Surface that records what it was asked to show
pub(crate) struct RecordingSurface {
    pub ticks: Ticks,
    pub presented: Vec<DisplayPayload>,
    pub present_cost_ms: u64,
    pub fail: Option<SurfaceError>,
}

impl RecordingSurface {
    pub(crate) fn new(ticks: &Ticks) -> Self {
        Self {
            ticks: ticks.clone(),
            presented: Vec::new(),
            present_cost_ms: 0,
            fail: None,
        }
    }
}

impl DisplaySurface for RecordingSurface {
    fn present(&mut self, payload: &DisplayPayload) -> impl Future<Output = Result<(), SurfaceError>> {
        advance(&self.ticks, self.present_cost_ms);
        let result = match self.fail {
            Some(err) => Err(err),
            None => {
                self.presented.push(payload.clone());
                Ok(())
            }
        };
        ready(result)
    }
}
