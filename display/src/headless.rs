use core_types::Frame;

use crate::sink::{DisplaySink, Overlay};

/// One recorded call to [`HeadlessDisplaySink::show`].
#[derive(Debug, Clone)]
pub struct ShownFrame {
    pub width: u32,
    pub height: u32,
    pub overlays: Vec<Overlay>,
    pub fps: f32,
}

/// A [`DisplaySink`] with no window: records every overlay set and FPS
/// value it's shown, and exposes a method to simulate the user pressing
/// `ESC`. Lets the Output stage's overlay/FPS/shutdown logic be
/// exercised without a GUI toolkit, the way `sort-tracker`'s tests
/// exercise the tracker manager without a camera.
#[derive(Default)]
pub struct HeadlessDisplaySink {
    pub shown: Vec<ShownFrame>,
    shutdown_requested: bool,
}

impl HeadlessDisplaySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }
}

impl DisplaySink for HeadlessDisplaySink {
    fn show(&mut self, frame: &Frame, overlays: &[Overlay], fps: f32) {
        self.shown.push(ShownFrame {
            width: frame.width,
            height: frame.height,
            overlays: overlays.to_vec(),
            fps,
        });
    }

    fn poll_shutdown(&mut self) -> bool {
        self.shutdown_requested
    }
}
