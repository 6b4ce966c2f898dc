use core_types::Frame;

/// A validated, clipped, on-screen rectangle plus its track ID label
/// (spec.md §4.I).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub id: u64,
}

/// The GUI display spec.md §1 scopes out: "specified only as a sink
/// interface". Grounded on the spec's own wording rather than any one
/// teacher GUI crate, since the teacher's display surfaces are all
/// web/BUI-based rather than a native window.
pub trait DisplaySink: Send {
    /// Render one frame with its track overlays and the current FPS HUD
    /// value.
    fn show(&mut self, frame: &Frame, overlays: &[Overlay], fps: f32);

    /// Non-blocking: `true` if the user has requested shutdown (`ESC`).
    fn poll_shutdown(&mut self) -> bool;
}
