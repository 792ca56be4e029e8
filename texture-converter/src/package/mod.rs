//! `.texture` package format and writer.
//!
//! A package is a fixed 32-byte little-endian header, the embedded name as
//! UTF-16 code units followed by one zero byte, and then the compressed
//! container bytes verbatim.
//!
//! ```text
//! ┌────────┬──────────────────────────────┐
//! │ offset │ field                        │
//! ├────────┼──────────────────────────────┤
//! │      0 │ name units + 37              │
//! │      4 │ payload length               │
//! │      8 │ width                        │
//! │     12 │ height                       │
//! │ 16..28 │ three zero flag words        │
//! │     28 │ pixel format flags           │
//! │     32 │ embedded name (UTF-16LE)     │
//! │ 32+2L  │ 0x00 terminator              │
//! │ 33+2L  │ payload                      │
//! └────────┴──────────────────────────────┘
//! ```
//!
//! The format is fixed; there is no versioning and no alternative layout.

mod format;
mod writer;

pub use format::{
    TexturePackage, FLAG_WORDS, HEADER_LEN, HEADER_LENGTH_BIAS, NAME_TERMINATOR,
    PIXEL_FORMAT_FLAGS,
};
pub use writer::{PackagedTexture, TexturePackager};
