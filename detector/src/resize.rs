/// Bilinear resize of an interleaved BGR8 buffer to `(w_out, h_out)`. A
/// hand-rolled pixel loop in the style of `imops`'s stride-aware
/// operators, rather than pulling in the teacher's `image` crate
/// dependency for what is a single small scaling routine.
pub(crate) fn resize_bgr(
    src: &[u8],
    w_in: u32,
    h_in: u32,
    w_out: u32,
    h_out: u32,
) -> Vec<u8> {
    let w_in = w_in as usize;
    let h_in = h_in as usize;
    let w_out = w_out as usize;
    let h_out = h_out as usize;
    let mut out = vec![0u8; w_out * h_out * 3];

    if w_in == 0 || h_in == 0 || w_out == 0 || h_out == 0 {
        return out;
    }

    let x_ratio = w_in as f32 / w_out as f32;
    let y_ratio = h_in as f32 / h_out as f32;

    for oy in 0..h_out {
        let sy = ((oy as f32 + 0.5) * y_ratio - 0.5).max(0.0);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(h_in - 1);
        let fy = sy - y0 as f32;

        for ox in 0..w_out {
            let sx = ((ox as f32 + 0.5) * x_ratio - 0.5).max(0.0);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(w_in - 1);
            let fx = sx - x0 as f32;

            for c in 0..3 {
                let p00 = src[(y0 * w_in + x0) * 3 + c] as f32;
                let p01 = src[(y0 * w_in + x1) * 3 + c] as f32;
                let p10 = src[(y1 * w_in + x0) * 3 + c] as f32;
                let p11 = src[(y1 * w_in + x1) * 3 + c] as f32;

                let top = p00 * (1.0 - fx) + p01 * fx;
                let bottom = p10 * (1.0 - fx) + p11 * fx;
                let value = top * (1.0 - fy) + bottom * fy;

                out[(oy * w_out + ox) * 3 + c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upscaling_a_flat_image_stays_flat() {
        let src = vec![42u8; 4 * 4 * 3];
        let out = resize_bgr(&src, 4, 4, 8, 8);
        assert_eq!(out.len(), 8 * 8 * 3);
        assert!(out.iter().all(|&b| b == 42));
    }

    #[test]
    fn downscaling_preserves_size_contract() {
        let src: Vec<u8> = (0..(16 * 16 * 3)).map(|i| (i % 256) as u8).collect();
        let out = resize_bgr(&src, 16, 16, 4, 4);
        assert_eq!(out.len(), 4 * 4 * 3);
    }

    #[test]
    fn identity_resize_matches_source_closely() {
        let src: Vec<u8> = (0..(6 * 6 * 3)).map(|i| (i * 7 % 256) as u8).collect();
        let out = resize_bgr(&src, 6, 6, 6, 6);
        for (a, b) in src.iter().zip(out.iter()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }
}
