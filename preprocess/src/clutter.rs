use core_types::Frame;

use crate::operator::Operator;

/// Background-subtraction masking (spec.md §6, `clutter_removal` block).
/// Maintains a per-byte running-mean background model across frames and
/// masks out pixels classified as background. Stateful, therefore **not
/// thread-safe** — must be owned by exactly one stage (spec.md §4.B),
/// mirroring the worker-owns-state shape of `image-tracker`'s
/// `BackgroundModel`, adapted here to a plain running mean over the raw
/// BGR buffer instead of an IPP-backed float image pair.
pub struct ClutterRemoval {
    history: u32,
    var_threshold: f32,
    detect_shadows: bool,
    mean: Option<Vec<f32>>,
    frames_seen: u32,
}

impl ClutterRemoval {
    pub fn new(history: u32, var_threshold: f32, detect_shadows: bool) -> Self {
        Self {
            history: history.max(1),
            var_threshold,
            detect_shadows,
            mean: None,
            frames_seen: 0,
        }
    }

    pub fn frames_seen(&self) -> u32 {
        self.frames_seen
    }
}

impl Operator for ClutterRemoval {
    fn apply(&mut self, frame: &mut Frame) {
        let mean = self
            .mean
            .get_or_insert_with(|| frame.data.iter().map(|&b| b as f32).collect());
        let alpha = 1.0 / self.history as f32;

        for (pixel, m) in frame.data.iter_mut().zip(mean.iter_mut()) {
            let diff = (*pixel as f32 - *m).abs();
            if diff <= self.var_threshold {
                *m = *m * (1.0 - alpha) + *pixel as f32 * alpha;
                *pixel = 0;
            } else if self.detect_shadows && diff <= self.var_threshold * 1.5 {
                *pixel = 128;
            }
            // else: classified foreground, left untouched.
        }
        self.frames_seen += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_seeds_background_and_is_masked() {
        let mut op = ClutterRemoval::new(50, 25.0, false);
        let mut f = Frame::new(4, 4, vec![100u8; 4 * 4 * 3], 0.0, 0);
        op.apply(&mut f);
        assert!(f.data.iter().all(|&b| b == 0));
        assert_eq!(op.frames_seen(), 1);
    }

    #[test]
    fn a_new_bright_region_survives_as_foreground() {
        let mut op = ClutterRemoval::new(50, 25.0, false);
        let mut f1 = Frame::new(4, 4, vec![20u8; 4 * 4 * 3], 0.0, 0);
        op.apply(&mut f1);

        let mut f2 = Frame::new(4, 4, vec![20u8; 4 * 4 * 3], 0.0, 1);
        // Inject a bright intruder pixel far from the learned background.
        f2.data[0] = 250;
        op.apply(&mut f2);
        assert_eq!(f2.data[0], 250);
    }
}
