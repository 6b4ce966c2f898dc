//! Detector adapter (spec.md §4.C): wraps the out-of-scope neural
//! inference backend behind a `frame -> detections` contract, handling
//! the resize-in/threshold/rescale-out bookkeeping the backend itself
//! does not do.

mod backend;
mod error;
mod resize;

pub use backend::{FixedBoxBackend, InferenceBackend, RawBox};
pub use error::DetectorError;

use core_types::{Detection, Frame};
use resize::resize_bgr;

const DEFAULT_THRESHOLD: f32 = 0.4;

/// Resizes to the backend's declared input size, runs inference,
/// filters by score, and rescales surviving boxes back to the original
/// frame's coordinates (spec.md §4.C).
pub struct DetectorAdapter<B: InferenceBackend> {
    backend: B,
    threshold: f32,
}

impl<B: InferenceBackend> DetectorAdapter<B> {
    pub fn new(backend: B, threshold: f32) -> Self {
        Self { backend, threshold }
    }

    pub fn with_default_threshold(backend: B) -> Self {
        Self::new(backend, DEFAULT_THRESHOLD)
    }

    pub fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, DetectorError> {
        let (w_in, h_in) = self.backend.input_size();
        let resized = resize_bgr(&frame.data, frame.width, frame.height, w_in, h_in);
        let raw = self.backend.infer(&resized)?;

        let sx = frame.width as f32 / w_in as f32;
        let sy = frame.height as f32 / h_in as f32;

        let detections: Vec<Detection> = raw
            .into_iter()
            .filter(|b| b.score > self.threshold)
            .map(|b| Detection::new(b.x1 * sx, b.y1 * sy, b.x2 * sx, b.y2 * sy, b.score))
            .collect();
        if detections.is_empty() {
            tracing::trace!("no detections above threshold this frame");
        }
        Ok(detections)
    }
}
