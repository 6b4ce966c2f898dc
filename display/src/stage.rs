use core_types::{Frame, TrackOutput};

use crate::sink::{DisplaySink, Overlay};

/// The Output stage (spec.md §4.I): validates and clips track boxes,
/// skips degenerate ones, maintains an EMA of FPS from capture
/// timestamps, and forwards everything to a [`DisplaySink`].
pub struct OutputStage<D: DisplaySink> {
    sink: D,
    fps_ema: Option<f32>,
    last_t: Option<f64>,
}

impl<D: DisplaySink> OutputStage<D> {
    pub fn new(sink: D) -> Self {
        Self {
            sink,
            fps_ema: None,
            last_t: None,
        }
    }

    pub fn fps_ema(&self) -> Option<f32> {
        self.fps_ema
    }

    /// Process one `(t, frame, tracks)` tuple. Returns `true` if the
    /// sink reports a shutdown request.
    pub fn process(&mut self, t: f64, frame: &Frame, tracks: &[TrackOutput]) -> bool {
        let overlays = build_overlays(frame, tracks);
        self.update_fps(t);
        self.sink.show(frame, &overlays, self.fps_ema.unwrap_or(0.0));
        self.sink.poll_shutdown()
    }

    /// `fps_ema <- 0.9*fps_ema + 0.1*(1/dt)`; initializes to the
    /// instantaneous value on the first valid `dt` (spec.md §4.I).
    fn update_fps(&mut self, t: f64) {
        if let Some(last) = self.last_t {
            let dt = t - last;
            if dt > 0.0 && dt.is_finite() {
                let instantaneous = (1.0 / dt) as f32;
                self.fps_ema = Some(match self.fps_ema {
                    Some(prev) => 0.9 * prev + 0.1 * instantaneous,
                    None => instantaneous,
                });
            }
        }
        self.last_t = Some(t);
    }
}

/// Validate finiteness, clip to frame bounds, and drop degenerate boxes
/// (spec.md §4.I).
fn build_overlays(frame: &Frame, tracks: &[TrackOutput]) -> Vec<Overlay> {
    let (w, h) = (frame.width as f32, frame.height as f32);
    tracks
        .iter()
        .filter_map(|t| {
            if !(t.x1.is_finite() && t.y1.is_finite() && t.x2.is_finite() && t.y2.is_finite()) {
                return None;
            }
            let x1 = t.x1.clamp(0.0, w);
            let y1 = t.y1.clamp(0.0, h);
            let x2 = t.x2.clamp(0.0, w);
            let y2 = t.y2.clamp(0.0, h);
            if !(x2 > x1 && y2 > y1) {
                return None;
            }
            Some(Overlay {
                x1,
                y1,
                x2,
                y2,
                id: t.id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDisplaySink;

    fn frame(w: u32, h: u32) -> Frame {
        Frame::new(w, h, vec![0u8; w as usize * h as usize * 3], 0.0, 0)
    }

    #[test]
    fn non_finite_track_is_dropped() {
        let mut stage = OutputStage::new(HeadlessDisplaySink::new());
        let tracks = vec![TrackOutput {
            x1: f32::NAN,
            y1: 0.0,
            x2: 10.0,
            y2: 10.0,
            id: 1,
        }];
        stage.process(0.0, &frame(100, 100), &tracks);
        assert!(stage.sink.shown[0].overlays.is_empty());
    }

    #[test]
    fn out_of_bounds_track_is_clipped_not_dropped() {
        let mut stage = OutputStage::new(HeadlessDisplaySink::new());
        let tracks = vec![TrackOutput {
            x1: -50.0,
            y1: -50.0,
            x2: 150.0,
            y2: 150.0,
            id: 2,
        }];
        stage.process(0.0, &frame(100, 100), &tracks);
        let overlay = stage.sink.shown[0].overlays[0];
        assert_eq!(overlay.x1, 0.0);
        assert_eq!(overlay.y1, 0.0);
        assert_eq!(overlay.x2, 100.0);
        assert_eq!(overlay.y2, 100.0);
    }

    #[test]
    fn degenerate_box_after_clipping_is_skipped() {
        let mut stage = OutputStage::new(HeadlessDisplaySink::new());
        // Entirely outside the frame: clips to a zero-area box.
        let tracks = vec![TrackOutput {
            x1: 200.0,
            y1: 200.0,
            x2: 300.0,
            y2: 300.0,
            id: 3,
        }];
        stage.process(0.0, &frame(100, 100), &tracks);
        assert!(stage.sink.shown[0].overlays.is_empty());
    }

    #[test]
    fn fps_ema_initializes_instantaneously_then_smooths() {
        let mut stage = OutputStage::new(HeadlessDisplaySink::new());
        stage.process(0.0, &frame(10, 10), &[]);
        assert_eq!(stage.fps_ema(), None);
        stage.process(1.0, &frame(10, 10), &[]);
        assert_eq!(stage.fps_ema(), Some(1.0));
        stage.process(2.0, &frame(10, 10), &[]);
        // 0.9*1.0 + 0.1*1.0 == 1.0 for a constant-rate sequence
        assert!((stage.fps_ema().unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shutdown_request_propagates_from_sink() {
        let mut stage = OutputStage::new(HeadlessDisplaySink::new());
        assert!(!stage.process(0.0, &frame(10, 10), &[]));
        stage.sink.request_shutdown();
        assert!(stage.process(1.0, &frame(10, 10), &[]));
    }
}
