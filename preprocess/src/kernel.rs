//! Shared convolution helpers used by the blur/sharpen operators. Plain
//! nested loops over the packed BGR buffer, in the style of `imops`'s
//! stride-aware pixel loops, rather than a generic image-processing
//! dependency — the pipeline only ever deals in one concrete layout.

use core_types::Frame;

/// 1D Gaussian kernel, normalized to sum to one. `ksize` is forced odd.
/// `sigma <= 0.0` derives a sigma from `ksize` the way OpenCV's
/// `getGaussianKernel` does.
pub(crate) fn gaussian_kernel(ksize: usize, sigma: f32) -> Vec<f32> {
    let ksize = if ksize % 2 == 0 { ksize + 1 } else { ksize.max(1) };
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let radius = (ksize / 2) as i32;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (-(x as f32 * x as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

/// Separable convolution: the 1D `kernel` applied horizontally then
/// vertically, per channel, with edge-clamped boundaries.
pub(crate) fn convolve_separable(frame: &Frame, kernel: &[f32]) -> Frame {
    let radius = (kernel.len() / 2) as i32;
    let w = frame.width as i32;
    let h = frame.height as i32;
    let stride = frame.stride();

    let mut horiz = vec![0f32; frame.data.len()];
    for y in 0..h {
        for x in 0..w {
            for c in 0..3 {
                let mut acc = 0.0f32;
                for (k_i, &k) in kernel.iter().enumerate() {
                    let dx = k_i as i32 - radius;
                    let sx = (x + dx).clamp(0, w - 1);
                    let idx = y as usize * stride + sx as usize * 3 + c;
                    acc += frame.data[idx] as f32 * k;
                }
                horiz[y as usize * stride + x as usize * 3 + c] = acc;
            }
        }
    }

    let mut out = vec![0u8; frame.data.len()];
    for y in 0..h {
        for x in 0..w {
            for c in 0..3 {
                let mut acc = 0.0f32;
                for (k_i, &k) in kernel.iter().enumerate() {
                    let dy = k_i as i32 - radius;
                    let sy = (y + dy).clamp(0, h - 1);
                    let idx = sy as usize * stride + x as usize * 3 + c;
                    acc += horiz[idx] * k;
                }
                out[y as usize * stride + x as usize * 3 + c] = acc.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Frame::new(frame.width, frame.height, out, frame.timestamp, frame.frame_number)
}

/// Direct (non-separable) 3x3 convolution with edge-clamped boundaries.
/// Returns raw (unclamped, signed) responses, one per byte of `frame.data`
/// — callers combine this with the original pixel values before clamping
/// back to `u8`.
pub(crate) fn convolve2d_3x3(frame: &Frame, kernel: &[f32; 9]) -> Vec<f32> {
    let w = frame.width as i32;
    let h = frame.height as i32;
    let stride = frame.stride();
    let mut out = vec![0.0f32; frame.data.len()];

    for y in 0..h {
        for x in 0..w {
            for c in 0..3 {
                let mut acc = 0.0f32;
                let mut k_i = 0usize;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let sy = (y + dy).clamp(0, h - 1);
                        let sx = (x + dx).clamp(0, w - 1);
                        let idx = sy as usize * stride + sx as usize * 3 + c;
                        acc += frame.data[idx] as f32 * kernel[k_i];
                        k_i += 1;
                    }
                }
                out[y as usize * stride + x as usize * 3 + c] = acc;
            }
        }
    }

    out
}
