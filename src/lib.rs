//! Magnetic Selection
//!
//! Edge-snapping selection and small image utilities for painting hosts,
//! with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Image inputs are `(height, width, channels)` arrays:
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! Selection masks are row-major `u8` buffers (255 = selected).
//!
//! ## Modules
//! - **selection**: magnetic outline search, rasterization, tool state machine
//! - **filters**: luminance extraction, eraser dabs
//! - **formats**: raw 16-bit heightmaps
//! - **config**: per-tool persisted preferences
//! - **geometry**: points, rects and angle helpers

pub mod config;
pub mod error;
pub mod filters;
pub mod formats;
pub mod geometry;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, SelectError};
pub use geometry::Point;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use pyo3::types::PyBytes;

    use crate::error::SelectError;
    use crate::filters::erase::{EraseOp, PaintInfo};
    use crate::filters::grayscale::luminance_u8;
    use crate::formats::heightmap::{decode_r16, encode_r16, ByteOrder, HeightmapOptions};
    use crate::geometry::Point;
    use crate::selection::rasterize::{fill_polygon, FillRule, MaskRasterizer};
    use crate::selection::{compute_outline, LuminancePlane, MagneticConfig, SelectionRasterizer};

    impl From<SelectError> for PyErr {
        fn from(err: SelectError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_points(raw: &[(f32, f32)]) -> Vec<Point> {
        raw.iter().map(|&p| p.into()).collect()
    }

    fn to_tuples(points: &[Point]) -> Vec<(f32, f32)> {
        points.iter().map(|&p| p.into()).collect()
    }

    fn fill_rule(even_odd: bool) -> FillRule {
        if even_odd {
            FillRule::EvenOdd
        } else {
            FillRule::NonZero
        }
    }

    fn byte_order(little_endian: bool) -> ByteOrder {
        if little_endian {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    fn magnetic_config(search_distance: u32, accuracy: f32, threshold: i32) -> PyResult<MagneticConfig> {
        let config = MagneticConfig {
            search_distance,
            accuracy,
            threshold,
            ..MagneticConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    // ========================================================================
    // Magnetic Selection
    // ========================================================================

    /// Snap a user curve to the nearest luminance edges.
    ///
    /// # Arguments
    /// * `image` - Image with 1, 3 or 4 channels (u8)
    /// * `curve` - List of (x, y) points drawn by the user
    /// * `search_distance` - Search ray length, 15-55 in steps of 5
    /// * `accuracy` - Spacing of search origins along the curve
    /// * `threshold` - Luminance difference that marks an edge
    ///
    /// # Returns
    /// Tuple of (resampled path, detected boundary) point lists
    #[pyfunction]
    #[pyo3(signature = (image, curve, search_distance=25, accuracy=2.0, threshold=20))]
    pub fn magnetic_outline(
        image: PyReadonlyArray3<'_, u8>,
        curve: Vec<(f32, f32)>,
        search_distance: u32,
        accuracy: f32,
        threshold: i32,
    ) -> PyResult<(Vec<(f32, f32)>, Vec<(f32, f32)>)> {
        let config = magnetic_config(search_distance, accuracy, threshold)?;
        let plane = LuminancePlane::from_image_u8(image.as_array());
        let outline = compute_outline(&to_points(&curve), &plane, &config)?;
        Ok((to_tuples(&outline.path), to_tuples(&outline.boundary)))
    }

    /// Snap a user curve to edges and rasterize the result.
    ///
    /// Returns a (height, width) u8 mask; all zeros when no edge was found.
    #[pyfunction]
    #[pyo3(signature = (image, curve, search_distance=25, accuracy=2.0, threshold=20, even_odd=false))]
    pub fn magnetic_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        curve: Vec<(f32, f32)>,
        search_distance: u32,
        accuracy: f32,
        threshold: i32,
        even_odd: bool,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let config = magnetic_config(search_distance, accuracy, threshold)?;
        let input = image.as_array();
        let (height, width, _) = input.dim();
        let plane = LuminancePlane::from_image_u8(input);
        let outline = compute_outline(&to_points(&curve), &plane, &config)?;

        let mask = MaskRasterizer::new(width, height).rasterize(&outline.boundary, fill_rule(even_odd));
        let result = ndarray::Array2::from_shape_vec((height, width), mask.mask)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(result.into_pyarray(py))
    }

    /// Rasterize a closed polygon into a (height, width) u8 mask.
    #[pyfunction]
    #[pyo3(signature = (polygon, width, height, even_odd=false))]
    pub fn polygon_mask<'py>(
        py: Python<'py>,
        polygon: Vec<(f32, f32)>,
        width: usize,
        height: usize,
        even_odd: bool,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let mask = fill_polygon(&to_points(&polygon), width, height, fill_rule(even_odd));
        let result = ndarray::Array2::from_shape_vec((height, width), mask.mask)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(result.into_pyarray(py))
    }

    /// Desaturated luminance plane (height, width) of a u8 image.
    #[pyfunction]
    pub fn luminance<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray2<u8>> {
        luminance_u8(image.as_array()).into_pyarray(py)
    }

    // ========================================================================
    // Eraser
    // ========================================================================

    /// Erase one brush dab from a copy of an RGBA layer.
    ///
    /// `dab` is a transparency mask: 0 where the brush fully covers.
    #[pyfunction]
    #[pyo3(signature = (layer, dab, x, y, opacity=255))]
    pub fn erase_dab<'py>(
        py: Python<'py>,
        layer: PyReadonlyArray3<'py, u8>,
        dab: PyReadonlyArray2<'py, u8>,
        x: f32,
        y: f32,
        opacity: u8,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut output = layer.as_array().to_owned();
        EraseOp::new().paint_at(&mut output, dab.as_array(), &PaintInfo::new(Point::new(x, y), opacity))?;
        Ok(output.into_pyarray(py))
    }

    // ========================================================================
    // Heightmap
    // ========================================================================

    /// Decode raw R16 bytes into a (height, width, 2) gray + alpha u16 image.
    #[pyfunction]
    #[pyo3(signature = (data, width, height, little_endian=false))]
    pub fn heightmap_decode<'py>(
        py: Python<'py>,
        data: &[u8],
        width: usize,
        height: usize,
        little_endian: bool,
    ) -> PyResult<Bound<'py, PyArray3<u16>>> {
        let options = HeightmapOptions::new(width, height, byte_order(little_endian));
        Ok(decode_r16(data, &options)?.into_pyarray(py))
    }

    /// Encode the gray channel of a (height, width, 1|2) u16 image as R16.
    #[pyfunction]
    #[pyo3(signature = (image, little_endian=false))]
    pub fn heightmap_encode<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u16>,
        little_endian: bool,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let data = encode_r16(image.as_array(), byte_order(little_endian))?;
        Ok(PyBytes::new(py, &data))
    }

    /// Magnetic selection extension module
    #[pymodule]
    pub fn magnetic_select(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Selection
        m.add_function(wrap_pyfunction!(magnetic_outline, m)?)?;
        m.add_function(wrap_pyfunction!(magnetic_mask, m)?)?;
        m.add_function(wrap_pyfunction!(polygon_mask, m)?)?;
        m.add_function(wrap_pyfunction!(luminance, m)?)?;

        // Paint ops
        m.add_function(wrap_pyfunction!(erase_dab, m)?)?;

        // Formats
        m.add_function(wrap_pyfunction!(heightmap_decode, m)?)?;
        m.add_function(wrap_pyfunction!(heightmap_encode, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::magnetic_select;
