use crate::camera::{Camera, FourCc};
use crate::error::CaptureError;

/// A camera requiring no hardware: generates a deterministic moving
/// gradient pattern, and can be configured to simulate both a narrower
/// set of supported FourCC codecs and periodic transient grab failures.
/// Stands in for the V4L2-equivalent driver spec.md §1 scopes out, the
/// way `ci2`'s backends stand behind the shared `Camera` trait.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    frame_index: u64,
    supported: Vec<FourCc>,
    fail_every: Option<u64>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_index: 0,
            supported: vec![FourCc::Mjpg, FourCc::Yuyv, FourCc::H264],
            fail_every: None,
        }
    }

    pub fn with_supported_fourcc(mut self, codecs: Vec<FourCc>) -> Self {
        self.supported = codecs;
        self
    }

    /// Every `n`th `read_frame` call fails transiently.
    pub fn with_transient_failures(mut self, n: u64) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }
}

impl Camera for SyntheticCamera {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn try_set_fourcc(&mut self, fourcc: FourCc) -> Result<(), CaptureError> {
        if self.supported.contains(&fourcc) {
            Ok(())
        } else {
            Err(CaptureError::OpenFailed(format!("unsupported fourcc {fourcc}")))
        }
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.frame_index += 1;
        if let Some(n) = self.fail_every {
            if self.frame_index % n == 0 {
                return Err(CaptureError::GrabFailed("synthetic transient failure".into()));
            }
        }

        let offset = (self.frame_index % 256) as u8;
        let mut data = vec![0u8; self.width as usize * self.height as usize * 3];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_add(offset);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_correctly_sized_frames() {
        let mut cam = SyntheticCamera::new(8, 6);
        let data = cam.read_frame().unwrap();
        assert_eq!(data.len(), 8 * 6 * 3);
    }

    #[test]
    fn rejects_unsupported_fourcc() {
        let mut cam = SyntheticCamera::new(8, 6).with_supported_fourcc(vec![FourCc::H264]);
        assert!(cam.try_set_fourcc(FourCc::Mjpg).is_err());
        assert!(cam.try_set_fourcc(FourCc::H264).is_ok());
    }

    #[test]
    fn simulates_periodic_transient_failures() {
        let mut cam = SyntheticCamera::new(4, 4).with_transient_failures(3);
        assert!(cam.read_frame().is_ok());
        assert!(cam.read_frame().is_ok());
        assert!(cam.read_frame().is_err());
        assert!(cam.read_frame().is_ok());
    }
}
