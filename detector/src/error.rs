/// Fatal per spec.md §7's `TrackNumericDegenerate`-adjacent taxonomy:
/// an inference failure surfaces all the way to the supervisor, unlike
/// the transient/logged failure modes in capture and tracking.
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error("inference backend error: {0}")]
    Inference(String),
}
