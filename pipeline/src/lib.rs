//! Pipeline stage (spec.md §4.H): owns the preprocessor chain, detector
//! adapter, and tracker manager, and runs the per-tick
//! pop -> preprocess -> detect -> track -> push loop.

use std::time::Instant;

use channellib::frame_channel::{FrameReceiver, FrameSender};
use core_types::{Frame, TrackOutput};
use detector::{DetectorAdapter, DetectorError, InferenceBackend};
use preprocess::Chain;
use sort_tracker::SortTracker;

pub type OutputTuple = (f64, Frame, Vec<TrackOutput>);

/// One tick's per-stage timings, in microseconds. Logged at `trace`
/// level, not accounted for in any invariant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickTimings {
    pub preprocess_us: u128,
    pub detect_us: u128,
    pub track_us: u128,
}

pub struct PipelineStage<B: InferenceBackend> {
    preprocessor: Chain,
    detector: DetectorAdapter<B>,
    tracker: SortTracker,
}

impl<B: InferenceBackend> PipelineStage<B> {
    pub fn new(preprocessor: Chain, detector: DetectorAdapter<B>, tracker: SortTracker) -> Self {
        Self {
            preprocessor,
            detector,
            tracker,
        }
    }

    /// One tick: preprocess in place, detect, then track — the tracker
    /// runs every tick, even against an empty detection set, so it can
    /// age existing tracks (spec.md §4.H invariant).
    pub fn tick(&mut self, t: f64, mut frame: Frame) -> Result<(OutputTuple, TickTimings), DetectorError> {
        let pre_start = Instant::now();
        self.preprocessor.apply(&mut frame);
        let preprocess_us = pre_start.elapsed().as_micros();

        let det_start = Instant::now();
        let detections = self.detector.detect(&frame)?;
        let detect_us = det_start.elapsed().as_micros();

        let trk_start = Instant::now();
        let tracks = self.tracker.update(&detections);
        let track_us = trk_start.elapsed().as_micros();

        let timings = TickTimings {
            preprocess_us,
            detect_us,
            track_us,
        };
        tracing::trace!(
            preprocess_us,
            detect_us,
            track_us,
            num_tracks = tracks.len(),
            "pipeline tick"
        );

        Ok(((t, frame, tracks), timings))
    }
}

/// Drive the Pipeline stage until `cap_rx` closes (or the detector fails
/// fatally), then close `out_tx` so Output sees end-of-stream.
pub fn run<B: InferenceBackend>(
    mut stage: PipelineStage<B>,
    cap_rx: &FrameReceiver<(f64, Frame)>,
    out_tx: &FrameSender<OutputTuple>,
) -> Result<(), DetectorError> {
    while let Some((t, frame)) = cap_rx.pop() {
        match stage.tick(t, frame) {
            Ok((tuple, _timings)) => {
                out_tx.push(tuple);
            }
            Err(e) => {
                out_tx.close();
                return Err(e);
            }
        }
    }
    out_tx.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use channellib::frame_channel::frame_channel;
    use detector::FixedBoxBackend;
    use sort_tracker::SortConfig;

    fn frame(n: usize) -> Frame {
        Frame::new(64, 64, vec![0u8; 64 * 64 * 3], n as f64, n)
    }

    #[test]
    fn each_tick_emits_exactly_one_output_tuple_even_with_no_detections() {
        let backend = FixedBoxBackend::empty((64, 64));
        let detector = DetectorAdapter::with_default_threshold(backend);
        let mut stage = PipelineStage::new(Chain::identity(), detector, SortTracker::new(SortConfig::default()));

        let ((t, out_frame, tracks), _) = stage.tick(0.0, frame(0)).unwrap();
        assert_eq!(t, 0.0);
        assert_eq!(out_frame.frame_number, 0);
        assert!(tracks.is_empty());
    }

    #[test]
    fn tracker_runs_every_tick_and_ages_out_with_no_detections() {
        let backend = FixedBoxBackend::empty((64, 64));
        let detector = DetectorAdapter::with_default_threshold(backend);
        let mut stage = PipelineStage::new(
            Chain::identity(),
            detector,
            SortTracker::new(SortConfig {
                max_age: 2,
                min_hits: 1,
                ..Default::default()
            }),
        );
        for i in 0..5 {
            stage.tick(i as f64, frame(i)).unwrap();
        }
        // With no detections ever, every tick still advances the tracker
        // (a no-op here since no tracks exist to age), and still emits a
        // tuple per tick.
    }

    #[test]
    fn run_closes_output_queue_once_input_queue_closes() {
        let (cap_tx, cap_rx) = frame_channel::<(f64, Frame)>(4);
        let (out_tx, out_rx) = frame_channel::<OutputTuple>(4);
        cap_tx.push((0.0, frame(0)));
        cap_tx.close();

        let backend = FixedBoxBackend::empty((64, 64));
        let detector = DetectorAdapter::with_default_threshold(backend);
        let stage = PipelineStage::new(Chain::identity(), detector, SortTracker::new(SortConfig::default()));

        run(stage, &cap_rx, &out_tx).unwrap();

        assert!(out_rx.pop().is_some());
        assert_eq!(out_rx.pop(), None);
    }
}
