//! Pixel operations used by the selection and paint tools.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//! | float variants | (H, W, C) | f32 | Same layouts, 0.0-1.0 |
//!
//! - **grayscale**: desaturated luminance plane for edge searching
//! - **erase**: eraser dab compositing (RGBA8 only)

pub mod grayscale;
pub mod erase;
