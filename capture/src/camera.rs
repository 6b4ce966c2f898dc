use crate::error::CaptureError;

/// Codecs probed in this fixed order at startup (spec.md §4.G).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FourCc {
    Mjpg,
    Yuyv,
    H264,
}

impl FourCc {
    pub const PROBE_ORDER: [FourCc; 3] = [FourCc::Mjpg, FourCc::Yuyv, FourCc::H264];
}

impl std::fmt::Display for FourCc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FourCc::Mjpg => "MJPG",
            FourCc::Yuyv => "YUYV",
            FourCc::H264 => "H264",
        };
        write!(f, "{s}")
    }
}

/// The producer-interface boundary spec.md §1 scopes the real camera
/// driver out of: "specified only at its interface". Grounded on
/// `ci2::Camera`, narrowed to the handful of operations the Capture
/// stage actually drives.
pub trait Camera: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Attempt to switch to `fourcc`. Used only during startup probing.
    fn try_set_fourcc(&mut self, fourcc: FourCc) -> Result<(), CaptureError>;

    /// Synchronous (blocking) frame acquisition. Returns an interleaved
    /// BGR8 buffer of `width() * height() * 3` bytes.
    fn read_frame(&mut self) -> Result<Vec<u8>, CaptureError>;
}
