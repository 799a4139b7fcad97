//! Read-only luminance sampling over the image plane.

use ndarray::{Array2, ArrayView3};

use crate::error::{Result, SelectError};
use crate::filters::grayscale::{luminance_f32, luminance_u8};
use crate::geometry::Point;

/// Scalar sampler the edge tracer walks over.
///
/// Implementations return the desaturated value (0-255) of the pixel
/// containing `point` and must report points outside the image with
/// [`SelectError::OutOfBounds`] instead of panicking.
pub trait LuminanceField {
    fn sample(&self, point: Point) -> Result<u8>;
}

impl<T: LuminanceField + ?Sized> LuminanceField for &T {
    fn sample(&self, point: Point) -> Result<u8> {
        (**self).sample(point)
    }
}

/// Luminance plane extracted once from an image.
#[derive(Clone, Debug)]
pub struct LuminancePlane {
    values: Array2<u8>,
}

impl LuminancePlane {
    /// Wrap an existing (height, width) value plane.
    pub fn new(values: Array2<u8>) -> Self {
        Self { values }
    }

    /// Desaturate a u8 image with 1, 3 or 4 channels.
    pub fn from_image_u8(image: ArrayView3<u8>) -> Self {
        Self::new(luminance_u8(image))
    }

    /// Desaturate an f32 (0.0-1.0) image with 1, 3 or 4 channels.
    pub fn from_image_f32(image: ArrayView3<f32>) -> Self {
        Self::new(luminance_f32(image))
    }

    pub fn width(&self) -> usize {
        self.values.dim().1
    }

    pub fn height(&self) -> usize {
        self.values.dim().0
    }

    pub fn values(&self) -> &Array2<u8> {
        &self.values
    }
}

impl LuminanceField for LuminancePlane {
    fn sample(&self, point: Point) -> Result<u8> {
        let (x, y) = point.to_pixel();
        let (height, width) = self.values.dim();
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return Err(SelectError::OutOfBounds { x, y });
        }
        Ok(self.values[[y as usize, x as usize]])
    }
}

/// Field backed by a closure over pixel coordinates; handy for synthetic
/// images. Returning `None` marks the pixel as out of bounds.
pub struct FnField<F>(pub F);

impl<F> FnField<F>
where
    F: Fn(i64, i64) -> Option<u8>,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> LuminanceField for FnField<F>
where
    F: Fn(i64, i64) -> Option<u8>,
{
    fn sample(&self, point: Point) -> Result<u8> {
        let (x, y) = point.to_pixel();
        (self.0)(x, y).ok_or(SelectError::OutOfBounds { x, y })
    }
}
