//! Luminance extraction for edge searching.
//!
//! Desaturates an image into a single value plane using ITU-R BT.709
//! luminosity coefficients. The magnetic selection samples this plane
//! instead of the color data, so every channel layout collapses to one
//! 0-255 value per pixel.
//!
//! ## Bit Depth Support
//!
//! - **u8 (8-bit)**: Values 0-255, used as-is
//! - **f32 (float)**: Values 0.0-1.0, scaled to 0-255
//!
//! Alpha (4th channel) is ignored.

use ndarray::{Array2, ArrayView3};
use rayon::prelude::*;

/// ITU-R BT.709 luminosity coefficients (same for all bit depths)
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

#[inline]
fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Desaturate a u8 image with 1, 3 or 4 channels into a luminance plane.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, channels)
///
/// # Returns
/// 2D array of shape (height, width) with values 0-255
pub fn luminance_u8(input: ArrayView3<u8>) -> Array2<u8> {
    let (height, width, channels) = input.dim();
    if width == 0 || height == 0 {
        return Array2::zeros((height, width));
    }

    let mut flat = vec![0u8; height * width];
    flat.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                row[x] = if channels < 3 {
                    input[[y, x, 0]]
                } else {
                    let r = input[[y, x, 0]] as f32;
                    let g = input[[y, x, 1]] as f32;
                    let b = input[[y, x, 2]] as f32;
                    luma(r, g, b).round().clamp(0.0, 255.0) as u8
                };
            }
        });

    Array2::from_shape_vec((height, width), flat)
        .expect("Shape mismatch in luminance_u8")
}

/// Desaturate an f32 image (0.0-1.0) with 1, 3 or 4 channels.
///
/// Output uses the same 0-255 scale as [`luminance_u8`] so the selection
/// threshold means the same thing for both bit depths.
pub fn luminance_f32(input: ArrayView3<f32>) -> Array2<u8> {
    let (height, width, channels) = input.dim();
    if width == 0 || height == 0 {
        return Array2::zeros((height, width));
    }

    let mut flat = vec![0u8; height * width];
    flat.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let value = if channels < 3 {
                    input[[y, x, 0]]
                } else {
                    luma(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]])
                };
                row[x] = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        });

    Array2::from_shape_vec((height, width), flat)
        .expect("Shape mismatch in luminance_f32")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_luminance_u8_red() {
        let mut img = Array3::<u8>::zeros((1, 1, 4));
        img[[0, 0, 0]] = 255;
        img[[0, 0, 3]] = 255;

        let result = luminance_u8(img.view());

        // 0.2126 * 255 ≈ 54
        assert!((result[[0, 0]] as i32 - 54).abs() <= 1);
    }

    #[test]
    fn test_luminance_u8_ignores_alpha() {
        let mut img = Array3::<u8>::zeros((1, 2, 4));
        for x in 0..2 {
            img[[0, x, 0]] = 128;
            img[[0, x, 1]] = 128;
            img[[0, x, 2]] = 128;
        }
        img[[0, 0, 3]] = 0;
        img[[0, 1, 3]] = 255;

        let result = luminance_u8(img.view());
        assert_eq!(result[[0, 0]], result[[0, 1]]);
        assert!((result[[0, 0]] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_luminance_single_channel_passthrough() {
        let mut img = Array3::<u8>::zeros((2, 3, 1));
        img[[1, 2, 0]] = 77;

        let result = luminance_u8(img.view());
        assert_eq!(result.dim(), (2, 3));
        assert_eq!(result[[1, 2]], 77);
        assert_eq!(result[[0, 0]], 0);
    }

    #[test]
    fn test_luminance_f32_matches_u8_scale() {
        let mut img_u8 = Array3::<u8>::zeros((1, 1, 3));
        img_u8[[0, 0, 0]] = 200;
        img_u8[[0, 0, 1]] = 100;
        img_u8[[0, 0, 2]] = 50;
        let img_f32 = img_u8.mapv(|v| v as f32 / 255.0);

        let a = luminance_u8(img_u8.view())[[0, 0]] as i32;
        let b = luminance_f32(img_f32.view())[[0, 0]] as i32;
        assert!((a - b).abs() <= 1, "u8={} f32={}", a, b);
    }

    #[test]
    fn test_empty_image() {
        let img = Array3::<u8>::zeros((0, 0, 4));
        assert_eq!(luminance_u8(img.view()).dim(), (0, 0));
    }
}
