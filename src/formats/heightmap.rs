//! Raw 16-bit heightmap (R16) import and export.
//!
//! R16 files have no header: `width * height` unsigned 16-bit gray samples,
//! row-major, in either byte order. The dimensions and byte order come from
//! the user, so the only validation possible is the file length.
//!
//! Imported images are gray + alpha `(height, width, 2)` arrays with alpha
//! fully opaque.

use std::fs;
use std::path::Path;

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SelectError};

/// Sample byte order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// "Mac" order, persisted as endianness 0.
    #[default]
    BigEndian,
    /// "PC" order, persisted as endianness 1.
    LittleEndian,
}

impl ByteOrder {
    /// Map the legacy integer setting (0 = big endian, anything else = little).
    pub fn from_endianness(value: i32) -> Self {
        if value == 0 {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    pub fn endianness(self) -> i32 {
        match self {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        }
    }

    #[inline]
    fn read(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        }
    }

    #[inline]
    fn write(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        }
    }
}

/// Import options; persisted between sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapOptions {
    pub width: usize,
    pub height: usize,
    pub byte_order: ByteOrder,
}

impl HeightmapOptions {
    pub fn new(width: usize, height: usize, byte_order: ByteOrder) -> Self {
        Self { width, height, byte_order }
    }

    /// Square heightmap of `size` x `size` samples.
    pub fn square(size: usize, byte_order: ByteOrder) -> Self {
        Self::new(size, size, byte_order)
    }

    /// Expected file length in bytes.
    pub fn byte_len(&self) -> Result<usize> {
        if self.width == 0 || self.height == 0 {
            return Err(SelectError::InvalidConfig(format!(
                "heightmap size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(2))
            .ok_or_else(|| SelectError::InvalidConfig("heightmap size overflows".to_string()))
    }
}

/// Decode raw R16 bytes into a gray + alpha image.
pub fn decode_r16(data: &[u8], options: &HeightmapOptions) -> Result<Array3<u16>> {
    let expected = options.byte_len()?;
    if data.len() != expected {
        return Err(SelectError::WrongSize {
            expected,
            actual: data.len(),
        });
    }

    let (width, height) = (options.width, options.height);
    let mut image = Array3::<u16>::zeros((height, width, 2));
    for (i, chunk) in data.chunks_exact(2).enumerate() {
        let (y, x) = (i / width, i % width);
        image[[y, x, 0]] = options.byte_order.read([chunk[0], chunk[1]]);
        image[[y, x, 1]] = u16::MAX;
    }

    Ok(image)
}

/// Encode the gray channel of a `(height, width, 1 | 2)` image as R16.
pub fn encode_r16(image: ArrayView3<u16>, byte_order: ByteOrder) -> Result<Vec<u8>> {
    let (height, width, channels) = image.dim();
    if channels == 0 || channels > 2 {
        return Err(SelectError::InvalidConfig(format!(
            "heightmap export needs 1 or 2 channels, got {}",
            channels
        )));
    }

    let mut out = Vec::with_capacity(width * height * 2);
    for y in 0..height {
        for x in 0..width {
            out.extend_from_slice(&byte_order.write(image[[y, x, 0]]));
        }
    }
    Ok(out)
}

/// Read an R16 file from disk.
pub fn read_heightmap(path: impl AsRef<Path>, options: &HeightmapOptions) -> Result<Array3<u16>> {
    let path = path.as_ref();
    debug!(path = %path.display(), ?options, "importing heightmap");
    let data = fs::read(path)?;
    decode_r16(&data, options)
}

/// Write an image's gray channel to disk as R16.
pub fn write_heightmap(path: impl AsRef<Path>, image: ArrayView3<u16>, byte_order: ByteOrder) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), ?byte_order, "exporting heightmap");
    let data = encode_r16(image, byte_order)?;
    fs::write(path, data)?;
    Ok(())
}
