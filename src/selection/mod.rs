//! Magnetic selection.
//!
//! Snaps a rough user-drawn curve to the nearest luminance edge:
//! - **resample**: evenly spaced search origins along the curve
//! - **trace**: per-origin edge search across the curve
//! - **rasterize**: boundary polygon to selection mask
//! - **tool**: gesture state machine tying it together

pub mod config;
pub mod luminance;
pub mod rasterize;
pub mod resample;
pub mod tool;
pub mod trace;

pub use config::MagneticConfig;
pub use luminance::{FnField, LuminanceField, LuminancePlane};
pub use rasterize::{FillRule, MaskRasterizer, SelectionAction, SelectionMask, SelectionRasterizer};
pub use resample::{resample, resample_with_mode, ResampleMode};
pub use tool::{MagneticSelectTool, SelectionCommand, ToolState};
pub use trace::{compute_outline, tangent_at, trace_edge, OutlineTrace, SearchRay};
