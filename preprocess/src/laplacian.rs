use core_types::Frame;

use crate::kernel::convolve2d_3x3;
use crate::operator::Operator;

/// Discrete 3x3 Laplacian, `[0,1,0; 1,-4,1; 0,1,0]`.
const LAPLACIAN_KERNEL: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

/// Laplacian sharpen deblur operator: `out = in - alpha * laplacian(in)`
/// (spec.md §6, `deblur` block). `ks` is accepted for config
/// compatibility; only the classic 3x3 kernel is implemented.
pub struct LaplacianSharpen {
    alpha: f32,
    #[allow(dead_code)]
    ks: usize,
}

impl LaplacianSharpen {
    pub fn new(alpha: f32, ks: usize) -> Self {
        Self { alpha, ks }
    }
}

impl Operator for LaplacianSharpen {
    fn apply(&mut self, frame: &mut Frame) {
        let laplacian = convolve2d_3x3(frame, &LAPLACIAN_KERNEL);
        for (pixel, &lap) in frame.data.iter_mut().zip(laplacian.iter()) {
            let sharpened = *pixel as f32 - self.alpha * lap;
            *pixel = sharpened.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_region_is_unchanged() {
        let mut op = LaplacianSharpen::new(1.2, 3);
        let mut f = Frame::new(6, 6, vec![77u8; 6 * 6 * 3], 0.0, 0);
        op.apply(&mut f);
        assert!(f.data.iter().all(|&b| b == 77));
    }

    #[test]
    fn zero_alpha_is_identity() {
        let mut op = LaplacianSharpen::new(0.0, 3);
        let mut f = Frame::new(6, 6, (0..6 * 6 * 3).map(|i| (i % 200) as u8).collect(), 0.0, 0);
        let before = f.data.clone();
        op.apply(&mut f);
        assert_eq!(f.data, before);
    }
}
