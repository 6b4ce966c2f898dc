//! Builds the concrete stage collaborators from a loaded [`EdgeConfig`].
//!
//! The real camera driver, neural accelerator, and GUI toolkit are all
//! external collaborators out of scope for this repository (spec.md §1);
//! until those are wired in, this module stands up the reference
//! implementations each crate ships for its trait boundary. A deployment
//! with real hardware replaces only this module.

use capture::SyntheticCamera;
use detector::{DetectorAdapter, FixedBoxBackend};
use display::HeadlessDisplaySink;
use edge_config::{EdgeConfig, Source};
use preprocess::Chain;
use sort_tracker::SortTracker;

pub fn build_camera(cfg: &EdgeConfig) -> SyntheticCamera {
    match &cfg.source {
        Source::CameraId(id) => {
            tracing::warn!(camera_id = id, "real camera driver is out of scope; using the synthetic reference camera");
        }
        Source::FilePath(path) => {
            tracing::warn!(path = %path, "file-based playback driver is out of scope; using the synthetic reference camera");
        }
    }
    SyntheticCamera::new(cfg.camera.width, cfg.camera.height)
}

pub fn build_detector(cfg: &EdgeConfig) -> DetectorAdapter<FixedBoxBackend> {
    tracing::warn!(
        model = ?cfg.detector.model,
        "neural inference backend is out of scope; using a fixed-box reference backend"
    );
    let backend = FixedBoxBackend::empty((cfg.camera.width, cfg.camera.height));
    DetectorAdapter::new(backend, cfg.detector.threshold)
}

pub fn build_preprocessor(cfg: &EdgeConfig) -> Chain {
    cfg.preprocessing.build_chain()
}

pub fn build_tracker(cfg: &EdgeConfig) -> SortTracker {
    SortTracker::new(cfg.tracker.build_sort_config())
}

/// The real GUI windowing toolkit is out of scope (spec.md §1): "the GUI
/// display — specified only as a sink interface". `display_gray` is
/// plumbed through to whatever concrete sink a deployment wires in here;
/// the headless reference sink ignores it (it never renders pixels).
pub fn build_display_sink(cfg: &EdgeConfig) -> HeadlessDisplaySink {
    if cfg.display_gray {
        tracing::debug!("display_gray requested; headless reference sink renders nothing");
    }
    tracing::warn!("GUI windowing toolkit is out of scope; using the headless reference display sink");
    HeadlessDisplaySink::new()
}
