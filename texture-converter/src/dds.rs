//! Minimal DDS container header reading.
//!
//! Only the two dimension fields are read. Everything else in the
//! container is trusted to be whatever the encoder (or the passthrough
//! source) produced.
//!
//! ```text
//! offset  0  "DDS " magic
//! offset  4  header size (124)
//! offset  8  flags
//! offset 12  height        <- read
//! offset 16  width         <- read
//! ```

use std::fmt;

use crate::error::{ConvertError, ConvertResult};

/// DDS magic bytes at offset 0.
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Byte offset of the little-endian height field.
pub const HEIGHT_OFFSET: usize = 12;

/// Byte offset of the little-endian width field.
pub const WIDTH_OFFSET: usize = 16;

/// Smallest container that covers both dimension fields.
pub const MIN_CONTAINER_LEN: usize = WIDTH_OFFSET + 4;

/// Pixel dimensions of a compressed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Read width and height from a compressed container.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedContainer`] if `data` is shorter than
/// [`MIN_CONTAINER_LEN`] bytes.
pub fn read_dimensions(data: &[u8]) -> ConvertResult<Dimensions> {
    if data.len() < MIN_CONTAINER_LEN {
        return Err(ConvertError::MalformedContainer(format!(
            "container is {} bytes, need at least {} to read dimensions",
            data.len(),
            MIN_CONTAINER_LEN
        )));
    }

    Ok(Dimensions {
        width: read_u32_le(data, WIDTH_OFFSET),
        height: read_u32_le(data, HEIGHT_OFFSET),
    })
}

/// Whether the container starts with the DDS magic.
pub fn has_dds_magic(data: &[u8]) -> bool {
    data.starts_with(DDS_MAGIC)
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
