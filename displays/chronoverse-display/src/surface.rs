//! Display surface backed by a frame buffer and a panel

use chronoverse_core::payload::DisplayPayload;
use chronoverse_core::traits::{DisplaySurface, SurfaceError};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::frame::FrameBuffer;
use crate::layout::layout;
use crate::panel::Panel;

/// Renders payloads into its frame buffer and commits them to a panel
pub struct EpaperSurface<P> {
    panel: P,
    frame: FrameBuffer,
}

impl<P: Panel> EpaperSurface<P> {
    /// Allocate the frame buffer and wrap `panel`
    pub fn new(panel: P) -> Result<Self, SurfaceError> {
        Ok(Self::with_frame(panel, FrameBuffer::for_panel()?))
    }

    pub fn with_frame(panel: P, frame: FrameBuffer) -> Self {
        Self { panel, frame }
    }

    /// Clear the frame and draw `payload` into it without touching the panel
    pub fn render(&mut self, payload: &DisplayPayload) {
        self.frame.clear_white();
        let layout = layout(payload, self.frame.size());
        for item in &layout.items {
            let style = MonoTextStyle::new(item.font, item.color);
            let _ = Text::with_baseline(item.text, item.position, style, Baseline::Top)
                .draw(&mut self.frame);
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }
}

impl<P: Panel> DisplaySurface for EpaperSurface<P> {
    async fn present(&mut self, payload: &DisplayPayload) -> Result<(), SurfaceError> {
        self.render(payload);
        self.panel.show(self.frame.black(), self.frame.red()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;
    use chronoverse_core::time::Timestamp;
    use embassy_futures::block_on;

    #[derive(Default)]
    struct FakePanel {
        shown: Vec<(Vec<u8>, Vec<u8>)>,
        fail: Option<SurfaceError>,
    }

    impl Panel for FakePanel {
        async fn show(&mut self, black: &[u8], red: &[u8]) -> Result<(), SurfaceError> {
            if let Some(err) = self.fail {
                return Err(err);
            }
            self.shown.push((black.to_vec(), red.to_vec()));
            Ok(())
        }
    }

    fn payload() -> DisplayPayload {
        let mut payload = DisplayPayload::time_only(&Timestamp::new(5, 7, 0, 0).unwrap());
        payload.label = Some(String::from("[Psalms]"));
        payload.body = String::from("The Lord is my shepherd");
        payload
    }

    #[test]
    fn test_present_commits_both_planes() {
        let mut surface = EpaperSurface::new(FakePanel::default()).unwrap();
        block_on(surface.present(&payload())).unwrap();

        let shown = &surface.panel().shown;
        assert_eq!(shown.len(), 1);
        let (black, red) = &shown[0];
        assert!(black.iter().any(|&b| b != 0));
        assert!(red.iter().any(|&b| b != 0));
        assert_eq!(black.as_slice(), surface.frame().black());
    }

    #[test]
    fn test_time_only_has_no_black_ink() {
        let mut surface = EpaperSurface::new(FakePanel::default()).unwrap();
        let payload = DisplayPayload::time_only(&Timestamp::new(12, 0, 0, 0).unwrap());
        surface.render(&payload);
        assert!(surface.frame().black().iter().all(|&b| b == 0));
        assert!(surface.frame().red().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_render_replaces_previous_frame() {
        let mut surface = EpaperSurface::new(FakePanel::default()).unwrap();
        surface.render(&payload());
        surface.render(&DisplayPayload::time_only(
            &Timestamp::new(12, 0, 0, 0).unwrap(),
        ));
        assert!(surface.frame().black().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_panel_error_propagates() {
        let panel = FakePanel {
            fail: Some(SurfaceError::Busy),
            ..FakePanel::default()
        };
        let mut surface = EpaperSurface::new(panel).unwrap();
        assert_eq!(
            block_on(surface.present(&payload())),
            Err(SurfaceError::Busy)
        );
    }
}
