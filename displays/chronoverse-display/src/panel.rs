//! Panel driver trait

use chronoverse_core::traits::SurfaceError;

/// A tri-color e-paper panel
///
/// Planes arrive in the panel's native scan order with a set bit meaning
/// ink, as produced by [`FrameBuffer`](crate::frame::FrameBuffer). The
/// implementation owns the electrical refresh: wake, load both RAMs,
/// trigger the update, wait for it to finish and go back to sleep.
pub trait Panel {
    fn show(
        &mut self,
        black: &[u8],
        red: &[u8],
    ) -> impl core::future::Future<Output = Result<(), SurfaceError>>;
}
