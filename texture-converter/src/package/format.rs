//! Byte layout of a `.texture` package.

use crate::dds::Dimensions;
use crate::error::{ConvertError, ConvertResult};

/// Size of the fixed header preceding the embedded name.
pub const HEADER_LEN: usize = 32;

/// Added to the embedded name's unit count to form the first header word.
///
/// The engine reading these packages expects exactly this value.
pub const HEADER_LENGTH_BIAS: u32 = 37;

/// Pixel format and mip policy word stored at offset 28.
pub const PIXEL_FORMAT_FLAGS: u32 = 844_649_472;

/// Flag words stored at offsets 16..32.
pub const FLAG_WORDS: [u32; 4] = [0, 0, 0, PIXEL_FORMAT_FLAGS];

/// Single byte written after the embedded name.
pub const NAME_TERMINATOR: u8 = 0;

/// A package ready to be serialized.
///
/// Borrows the container bytes; packages are built, written once and
/// dropped.
#[derive(Debug, Clone)]
pub struct TexturePackage<'a> {
    embedded_name: Vec<u16>,
    dimensions: Dimensions,
    payload: &'a [u8],
}

impl<'a> TexturePackage<'a> {
    /// Build a package around `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MalformedContainer`] if the payload or the
    /// name are too large for their 32-bit length fields.
    pub fn new(
        embedded_name: &str,
        dimensions: Dimensions,
        payload: &'a [u8],
    ) -> ConvertResult<Self> {
        let embedded_name: Vec<u16> = embedded_name.encode_utf16().collect();

        if i32::try_from(payload.len()).is_err() {
            return Err(ConvertError::MalformedContainer(format!(
                "container of {} bytes exceeds the package length field",
                payload.len()
            )));
        }
        let max_name = (i32::MAX as u32 - HEADER_LENGTH_BIAS) as usize;
        if embedded_name.len() > max_name {
            return Err(ConvertError::MalformedContainer(format!(
                "embedded name of {} units exceeds the package length field",
                embedded_name.len()
            )));
        }

        Ok(Self {
            embedded_name,
            dimensions,
            payload,
        })
    }

    /// Value of the first header word: name units plus [`HEADER_LENGTH_BIAS`].
    pub fn header_length(&self) -> u32 {
        self.embedded_name.len() as u32 + HEADER_LENGTH_BIAS
    }

    /// Value of the second header word: the container byte count.
    pub fn payload_length(&self) -> u32 {
        self.payload.len() as u32
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of UTF-16 units in the embedded name.
    pub fn name_units(&self) -> usize {
        self.embedded_name.len()
    }

    /// Total serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + 2 * self.embedded_name.len() + 1 + self.payload.len()
    }

    /// Serialize the package.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());

        out.extend_from_slice(&self.header_length().to_le_bytes());
        out.extend_from_slice(&self.payload_length().to_le_bytes());
        out.extend_from_slice(&self.dimensions.width.to_le_bytes());
        out.extend_from_slice(&self.dimensions.height.to_le_bytes());
        for word in FLAG_WORDS {
            out.extend_from_slice(&word.to_le_bytes());
        }

        for unit in &self.embedded_name {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out.push(NAME_TERMINATOR);

        out.extend_from_slice(self.payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_header_fields() {
        let payload = vec![0xAB; 64];
        let name = "texture_library/foo/bar.dds";
        let package = TexturePackage::new(name, Dimensions::new(4, 8), &payload).unwrap();
        let bytes = package.to_bytes();

        assert_eq!(word(&bytes, 0), name.len() as u32 + 37);
        assert_eq!(word(&bytes, 4), 64);
        assert_eq!(word(&bytes, 8), 4);
        assert_eq!(word(&bytes, 12), 8);
        assert_eq!(word(&bytes, 16), 0);
        assert_eq!(word(&bytes, 20), 0);
        assert_eq!(word(&bytes, 24), 0);
        assert_eq!(word(&bytes, 28), 844_649_472);
    }

    #[test]
    fn test_total_length() {
        let payload = vec![1u8; 100];
        let name = "texture_library/a.dds";
        let package = TexturePackage::new(name, Dimensions::new(1, 1), &payload).unwrap();
        let bytes = package.to_bytes();

        let l = name.len();
        assert_eq!(bytes.len(), 32 + 2 * l + 1 + 100);
        assert_eq!(bytes.len(), package.encoded_len());
    }

    #[test]
    fn test_name_is_utf16le_with_terminator() {
        let payload = [9u8, 9, 9];
        let package = TexturePackage::new("ab", Dimensions::new(1, 1), &payload).unwrap();
        let bytes = package.to_bytes();

        assert_eq!(&bytes[32..36], &[b'a', 0, b'b', 0]);
        assert_eq!(bytes[36], NAME_TERMINATOR);
        assert_eq!(&bytes[37..], &payload);
    }

    #[test]
    fn test_non_ascii_name_counts_code_units() {
        let package = TexturePackage::new("é𝄞", Dimensions::new(1, 1), &[]).unwrap();
        // é is one unit, 𝄞 is a surrogate pair
        assert_eq!(package.name_units(), 3);
        assert_eq!(package.header_length(), 40);
    }

    #[test]
    fn test_empty_payload_and_name() {
        let package = TexturePackage::new("", Dimensions::new(0, 0), &[]).unwrap();
        let bytes = package.to_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(word(&bytes, 0), 37);
        assert_eq!(word(&bytes, 4), 0);
    }

    #[test]
    fn test_flag_constant_bytes() {
        assert_eq!(PIXEL_FORMAT_FLAGS.to_le_bytes(), [0x00, 0x54, 0x58, 0x32]);
    }
}
