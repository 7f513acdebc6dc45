//! Display surface trait

use crate::payload::DisplayPayload;

/// Errors from the display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Frame buffers could not be allocated
    Allocation,
    /// The panel bus failed
    Bus,
    /// The panel stayed busy past its refresh deadline
    Busy,
}

/// A surface that can show a [`DisplayPayload`]
///
/// `present` clears the frame, draws the time, label and body, and
/// commits the result to the panel.
pub trait DisplaySurface {
    fn present(
        &mut self,
        payload: &DisplayPayload,
    ) -> impl core::future::Future<Output = Result<(), SurfaceError>>;
}
