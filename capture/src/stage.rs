use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use channellib::frame_channel::FrameSender;
use core_types::Frame;

use crate::camera::{Camera, FourCc};
use crate::error::CaptureError;

const GRAB_RETRY_SLEEP: Duration = Duration::from_millis(20);
const DROP_LOG_INTERVAL: u64 = 100;

/// The Capture stage (spec.md §4.G): owns a [`Camera`], probes FourCC
/// codecs on startup, then loops reading frames, timestamping them, and
/// pushing onto the handoff queue with drop-oldest semantics.
pub struct CaptureStage<C: Camera> {
    camera: C,
    start: Instant,
    frame_number: usize,
    dropped_since_log: u64,
}

impl<C: Camera> CaptureStage<C> {
    pub fn new(camera: C) -> Self {
        Self {
            camera,
            start: Instant::now(),
            frame_number: 0,
            dropped_since_log: 0,
        }
    }

    fn now_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Probe `MJPG, YUYV, H264` in order, test-reading three frames for
    /// each. The first codec that yields three successful reads wins; if
    /// none do, capture fails fatally at startup (spec.md §4.G).
    pub fn probe_fourcc(&mut self) -> Result<FourCc, CaptureError> {
        for &fourcc in FourCc::PROBE_ORDER.iter() {
            if self.camera.try_set_fourcc(fourcc).is_err() {
                continue;
            }
            let mut ok = true;
            for _ in 0..3 {
                if self.camera.read_frame().is_err() {
                    ok = false;
                    break;
                }
            }
            if ok {
                tracing::info!(%fourcc, "capture codec selected");
                return Ok(fourcc);
            }
        }
        Err(CaptureError::NoWorkingFourcc)
    }

    /// Run the capture loop until `stop` is set. Always closes `sender`
    /// on exit, including on error, so downstream stages see end-of-stream.
    pub fn run(&mut self, sender: &FrameSender<(f64, Frame)>, stop: &AtomicBool) -> Result<(), CaptureError> {
        let probe_result = self.probe_fourcc();
        if let Err(e) = probe_result {
            sender.close();
            return Err(e);
        }

        while !stop.load(Ordering::Relaxed) {
            match self.camera.read_frame() {
                Ok(data) => {
                    let t = self.now_seconds();
                    let frame = Frame::new(self.camera.width(), self.camera.height(), data, t, self.frame_number);
                    self.frame_number += 1;

                    if sender.push((t, frame)) {
                        self.dropped_since_log += 1;
                        if self.dropped_since_log % DROP_LOG_INTERVAL == 0 {
                            tracing::debug!(total_dropped = sender.dropped_count(), "capQ drop-oldest events");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "capture transient failure");
                    std::thread::sleep(GRAB_RETRY_SLEEP);
                }
            }
        }

        sender.close();
        Ok(())
    }
}
