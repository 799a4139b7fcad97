//! Eraser paint operation.
//!
//! Stamps a brush dab onto an RGBA layer with the erase composite: the
//! layer's alpha is reduced, its color channels are left as they are.
//!
//! Brush dabs are transparency masks: 0 where the tip fully covers the
//! canvas, 255 where it leaves it untouched. The op inverts the dab alpha
//! before compositing, so a fully covered texel at full opacity clears the
//! destination pixel.

use ndarray::{Array3, ArrayView2};

use crate::error::{Result, SelectError};
use crate::geometry::{Point, Rect};

/// Per-dab paint information.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintInfo {
    /// Position of the brush hotspot in layer pixels.
    pub pos: Point,
    /// Stroke opacity (0-255).
    pub opacity: u8,
}

impl PaintInfo {
    pub fn new(pos: Point, opacity: u8) -> Self {
        Self { pos, opacity }
    }
}

/// Eraser that clips every dab to the layer and to optional painter bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct EraseOp {
    bounds: Option<Rect>,
}

impl EraseOp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict painting to `bounds` (e.g. the image rect).
    pub fn with_bounds(bounds: Rect) -> Self {
        Self { bounds: Some(bounds) }
    }

    /// Erase one dab centered on `info.pos`.
    ///
    /// # Arguments
    /// * `layer` - RGBA u8 layer of shape (height, width, 4), modified in place
    /// * `dab` - Brush transparency mask of shape (dab_height, dab_width)
    /// * `info` - Hotspot position and opacity
    ///
    /// # Returns
    /// The rect that was touched, or `None` when the dab fell outside the
    /// layer or bounds entirely.
    pub fn paint_at(
        &self,
        layer: &mut Array3<u8>,
        dab: ArrayView2<u8>,
        info: &PaintInfo,
    ) -> Result<Option<Rect>> {
        let (height, width, channels) = layer.dim();
        if channels != 4 {
            return Err(SelectError::InvalidConfig(format!(
                "erase target must have 4 channels, got {}",
                channels
            )));
        }

        let (dab_h, dab_w) = dab.dim();
        if dab_w == 0 || dab_h == 0 {
            return Ok(None);
        }

        let hotspot = Point::new(dab_w as f32 / 2.0, dab_h as f32 / 2.0);
        let top_left = info.pos - hotspot;
        let dest_x = top_left.x.floor() as i32;
        let dest_y = top_left.y.floor() as i32;

        let mut dst_rect = Rect::new(dest_x, dest_y, dab_w as i32, dab_h as i32)
            .intersected(&Rect::new(0, 0, width as i32, height as i32));
        if let Some(bounds) = self.bounds {
            dst_rect = dst_rect.intersected(&bounds);
        }
        if dst_rect.is_empty() {
            return Ok(None);
        }

        let sx = (dst_rect.x - dest_x) as usize;
        let sy = (dst_rect.y - dest_y) as usize;
        let opacity = info.opacity as u32;

        for row in 0..dst_rect.height as usize {
            for col in 0..dst_rect.width as usize {
                let coverage = 255 - dab[[sy + row, sx + col]] as u32;
                let strength = div255(coverage * opacity);
                let ly = dst_rect.y as usize + row;
                let lx = dst_rect.x as usize + col;
                let alpha = layer[[ly, lx, 3]] as u32;
                layer[[ly, lx, 3]] = div255(alpha * (255 - strength)) as u8;
            }
        }

        Ok(Some(dst_rect))
    }
}

/// Rounded division by 255 for products of two u8 values.
#[inline]
fn div255(v: u32) -> u32 {
    (v + 127) / 255
}
