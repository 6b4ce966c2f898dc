use crate::error::DetectorError;

/// A box in the inference backend's fixed input coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
}

/// The external collaborator spec.md §1 scopes out: "invoked as a pure
/// function `frame -> detections`". Everything around this boundary
/// (resize-in, threshold, rescale-out) is [`crate::DetectorAdapter`]'s
/// job, not the backend's.
pub trait InferenceBackend: Send {
    /// The model's fixed input size, `(W_in, H_in)`.
    fn input_size(&self) -> (u32, u32);

    /// Run inference on an interleaved BGR8 buffer already resized to
    /// `input_size()`. Boxes are in that resized frame's coordinates,
    /// unfiltered by score.
    fn infer(&mut self, resized_bgr: &[u8]) -> Result<Vec<RawBox>, DetectorError>;
}

/// A synthetic backend standing in for the real neural accelerator,
/// which spec.md §1 scopes out entirely. Always reports the same fixed
/// set of boxes at a constant score, which makes Pipeline-stage
/// orchestration logic testable without real hardware or a model file.
pub struct FixedBoxBackend {
    input_size: (u32, u32),
    boxes: Vec<RawBox>,
}

impl FixedBoxBackend {
    pub fn new(input_size: (u32, u32), boxes: Vec<RawBox>) -> Self {
        Self { input_size, boxes }
    }

    /// A single centered box at a fixed, always-above-threshold score.
    pub fn single_centered_box(input_size: (u32, u32), score: f32) -> Self {
        let (w, h) = (input_size.0 as f32, input_size.1 as f32);
        let boxes = vec![RawBox {
            x1: w * 0.25,
            y1: h * 0.25,
            x2: w * 0.75,
            y2: h * 0.75,
            score,
        }];
        Self::new(input_size, boxes)
    }

    /// A backend that never detects anything.
    pub fn empty(input_size: (u32, u32)) -> Self {
        Self::new(input_size, Vec::new())
    }
}

impl InferenceBackend for FixedBoxBackend {
    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn infer(&mut self, _resized_bgr: &[u8]) -> Result<Vec<RawBox>, DetectorError> {
        Ok(self.boxes.clone())
    }
}
