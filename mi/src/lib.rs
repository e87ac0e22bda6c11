//! Encoder and decoder for the `.mi` image format used by the MiraOS renderer.
//!
//! `.mi` is an uncompressed raster format: a small header followed by one fixed-size record per
//! pixel. There is no magic, no compression, no checksum and no alpha channel. Images with
//! transparency are composited onto opaque black before encoding (see
//! [`SourceImage::composite_on_black`]).
//!
//! # Header
//!
//! - u32le width
//! - u32le height
//!
//! # Pixel array
//!
//! `width * height` records in row-major order (row 0 left to right, then row 1, ...):
//!
//! ```plain
//! .- pixel record --------------------------------------.
//! |  Byte[0]  |  Byte[1]  |  Byte[2]  |     Byte[3]     |
//! |-----------+-----------+-----------+-----------------|
//! |   blue    |   green   |    red    |  0x00 reserved  |
//! `-----------------------------------------------------`
//! ```
//!
//! The reserved byte is always written as zero and ignored when reading. A file is therefore
//! always exactly `8 + width * height * 4` bytes long.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
pub mod encode;
#[cfg(feature = "alloc")]
pub mod raster;

pub mod decode;
pub mod utils;

pub use decode::MiDecoder;
#[cfg(feature = "alloc")]
pub use encode::MiEncoder;
#[cfg(feature = "alloc")]
pub use raster::{CompositedImage, SourceImage};

/// The dimensions stored at the start of every `.mi` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Pixels per row.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

pub mod consts {
    /// Size of the `width`/`height` header in bytes.
    pub const MI_HEADER_LEN: usize = 8;

    /// Size of a single `[B, G, R, 0x00]` pixel record.
    pub const MI_BYTES_PER_PIXEL: usize = 4;

    /// Value of the fourth byte of every pixel record.
    pub const MI_RESERVED: u8 = 0x00;

    /// Conventional file extension, without the dot.
    pub const MI_EXTENSION: &str = "mi";
}

/// Returns the exact size of an encoded image, or `None` if it does not fit in a `usize`.
pub const fn encoded_len(width: u32, height: u32) -> Option<usize> {
    match (width as usize).checked_mul(height as usize) {
        Some(pixels) => match pixels.checked_mul(consts::MI_BYTES_PER_PIXEL) {
            Some(len) => len.checked_add(consts::MI_HEADER_LEN),
            None => None,
        },
        None => None,
    }
}
