/// Capture-stage error taxonomy (spec.md §7): `OpenFailed` and
/// `NoWorkingFourcc` are `StartupFatal`; `GrabFailed` is
/// `CaptureTransient` — logged and retried, never fatal mid-run.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("camera open failed: {0}")]
    OpenFailed(String),
    #[error("no working FourCC codec found (tried MJPG, YUYV, H264)")]
    NoWorkingFourcc,
    #[error("frame grab failed: {0}")]
    GrabFailed(String),
}
