//! Refresh scheduler
//!
//! Drives the minute cadence: reads the time, gates the hourly sync,
//! resolves content, presents it, and sizes the sleep that follows.

pub mod refresh;
pub mod report;
pub mod timing;

pub use refresh::RefreshScheduler;
pub use report::{BootReport, CycleReport, Presentation, RefreshReport, ReportSink};
pub use timing::{alignment_delay, sleep_interval};
