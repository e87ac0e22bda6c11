use crate::{
    encoded_len,
    raster::CompositedImage,
    utils::{header_fields, rgb_to_bgr0},
};
use alloc::vec::Vec;
use snafu::{OptionExt, Snafu};

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum EncodeToVecError {
    #[snafu(display("Image dimensions {width}x{height} don't fit the u32 header fields"))]
    DimensionOverflow { width: usize, height: usize },
}

/// Stateless `.mi` encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiEncoder;

impl MiEncoder {
    /// Appends the encoded image to `w`.
    ///
    /// Nothing is appended if the dimensions can't be represented in the header.
    pub fn encode_to_vec(image: &CompositedImage, w: &mut Vec<u8>) -> Result<(), EncodeToVecError> {
        let (width, height) = header_fields(image.width(), image.height()).context(
            encode_to_vec_error::DimensionOverflowSnafu {
                width: image.width(),
                height: image.height(),
            },
        )?;

        if let Some(len) = encoded_len(width, height) {
            w.reserve_exact(len);
        }

        w.extend_from_slice(&width.to_le_bytes());
        w.extend_from_slice(&height.to_le_bytes());

        for pixel in image.pixels() {
            w.extend_from_slice(&rgb_to_bgr0(pixel));
        }

        Ok(())
    }
}
