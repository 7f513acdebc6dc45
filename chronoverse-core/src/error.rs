//! Error taxonomy
//!
//! Every collaborator error maps onto one [`ErrorKind`]. Only
//! [`ErrorKind::Allocation`] is fatal; everything else is reported and the
//! refresh loop carries on.

use crate::traits::{LinkError, StoreError, SurfaceError, TimeError};

/// Error categories the refresh engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// The network link never came up within its budget
    Connectivity,
    /// The time source has no usable wall-clock time
    TimeUnavailable,
    /// A sync was attempted but the time exchange failed
    SyncFailure,
    /// The content store could not produce the hour's bucket
    ContentLoad,
    /// No entry exists for the current minute
    MissingEntry,
    /// The panel rejected or failed a refresh
    Presentation,
    /// Display buffers could not be allocated
    Allocation,
}

impl ErrorKind {
    /// Whether this error stops the device
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::Allocation)
    }
}

impl From<LinkError> for ErrorKind {
    fn from(_: LinkError) -> Self {
        ErrorKind::Connectivity
    }
}

impl From<TimeError> for ErrorKind {
    fn from(e: TimeError) -> Self {
        match e {
            TimeError::Unavailable => ErrorKind::TimeUnavailable,
            TimeError::Timeout | TimeError::Network | TimeError::Protocol => {
                ErrorKind::SyncFailure
            }
        }
    }
}

impl From<StoreError> for ErrorKind {
    fn from(_: StoreError) -> Self {
        ErrorKind::ContentLoad
    }
}

impl From<SurfaceError> for ErrorKind {
    fn from(e: SurfaceError) -> Self {
        match e {
            SurfaceError::Allocation => ErrorKind::Allocation,
            SurfaceError::Bus | SurfaceError::Busy => ErrorKind::Presentation,
        }
    }
}
