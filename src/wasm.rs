//! WebAssembly exports for magnetic selection.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! flat RGBA u8 buffers (length = width * height * 4); point lists are flat
//! `[x0, y0, x1, y1, ...]` f32 arrays.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::error::SelectError;
use crate::formats::heightmap::{decode_r16, encode_r16, ByteOrder, HeightmapOptions};
use crate::geometry::Point;
use crate::selection::{compute_outline, LuminancePlane, MagneticConfig, MaskRasterizer, SelectionRasterizer};

fn js_error(err: SelectError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn rgba_plane(data: &[u8], width: usize, height: usize) -> Result<LuminancePlane, JsValue> {
    let input = Array3::from_shape_vec((height, width, 4), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("Invalid dimensions: {}", e)))?;
    Ok(LuminancePlane::from_image_u8(input.view()))
}

fn points_from_flat(flat: &[f32]) -> Vec<Point> {
    flat.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

fn config_for(search_distance: u32) -> Result<MagneticConfig, JsValue> {
    let config = MagneticConfig {
        search_distance,
        ..MagneticConfig::default()
    };
    config.validate().map_err(js_error)?;
    Ok(config)
}

// ============================================================================
// Magnetic Selection
// ============================================================================

/// Detect the edge points for a user curve.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `curve` - Flat array of curve coordinates
/// * `search_distance` - Search ray length, 15-55 in steps of 5
///
/// # Returns
/// Flat array of boundary coordinates
#[wasm_bindgen]
pub fn magnetic_outline_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    curve: &[f32],
    search_distance: u32,
) -> Result<Vec<f32>, JsValue> {
    let plane = rgba_plane(data, width, height)?;
    let config = config_for(search_distance)?;
    let outline = compute_outline(&points_from_flat(curve), &plane, &config).map_err(js_error)?;

    Ok(outline.boundary.iter().flat_map(|p| [p.x, p.y]).collect())
}

/// Detect edges for a user curve and rasterize them into a selection mask.
///
/// # Returns
/// Flat mask of width * height bytes (255 = selected)
#[wasm_bindgen]
pub fn magnetic_mask_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    curve: &[f32],
    search_distance: u32,
) -> Result<Vec<u8>, JsValue> {
    let plane = rgba_plane(data, width, height)?;
    let config = config_for(search_distance)?;
    let outline = compute_outline(&points_from_flat(curve), &plane, &config).map_err(js_error)?;

    let mask = MaskRasterizer::new(width, height).rasterize(&outline.boundary, config.fill_rule);
    Ok(mask.mask)
}

// ============================================================================
// Heightmap
// ============================================================================

/// Decode raw R16 bytes into a flat gray u16 array (alpha dropped).
#[wasm_bindgen]
pub fn heightmap_decode_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    little_endian: bool,
) -> Result<Vec<u16>, JsValue> {
    let order = if little_endian { ByteOrder::LittleEndian } else { ByteOrder::BigEndian };
    let image = decode_r16(data, &HeightmapOptions::new(width, height, order)).map_err(js_error)?;
    Ok(image.index_axis(ndarray::Axis(2), 0).iter().copied().collect())
}

/// Encode a flat gray u16 array as raw R16 bytes.
#[wasm_bindgen]
pub fn heightmap_encode_wasm(
    gray: &[u16],
    width: usize,
    height: usize,
    little_endian: bool,
) -> Result<Vec<u8>, JsValue> {
    let order = if little_endian { ByteOrder::LittleEndian } else { ByteOrder::BigEndian };
    let image = Array3::from_shape_vec((height, width, 1), gray.to_vec())
        .map_err(|e| JsValue::from_str(&format!("Invalid dimensions: {}", e)))?;
    encode_r16(image.view(), order).map_err(js_error)
}
