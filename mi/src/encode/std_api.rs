use crate::{
    encode::MiEncoder,
    raster::CompositedImage,
    utils::{header_fields, rgb_to_bgr0},
};
use byteorder::{LittleEndian, WriteBytesExt};
use snafu::{OptionExt, ResultExt, Snafu};
use std::io::Write;

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display("Image dimensions {width}x{height} don't fit the u32 header fields"))]
    DimensionOverflow { width: usize, height: usize },
    WriteIo { source: std::io::Error },
}

impl MiEncoder {
    /// Writes the encoded image to `w`.
    ///
    /// The dimensions are checked before the first write, so an oversized image leaves `w`
    /// untouched. `w` is written to in small pieces; wrap it in a `BufWriter` if that matters.
    pub fn encode<W: Write>(image: &CompositedImage, mut w: W) -> Result<(), EncodeError> {
        let (width, height) = header_fields(image.width(), image.height()).context(
            DimensionOverflowSnafu {
                width: image.width(),
                height: image.height(),
            },
        )?;

        Self::encode_header(width, height, &mut w)?;
        Self::encode_pixels(image, w)?;

        Ok(())
    }

    pub fn encode_header<W: Write>(width: u32, height: u32, mut w: W) -> Result<(), EncodeError> {
        w.write_u32::<LittleEndian>(width).context(WriteIoSnafu)?;
        w.write_u32::<LittleEndian>(height).context(WriteIoSnafu)
    }

    pub fn encode_pixels<W: Write>(image: &CompositedImage, mut w: W) -> Result<(), EncodeError> {
        for pixel in image.pixels() {
            w.write_all(&rgb_to_bgr0(pixel)).context(WriteIoSnafu)?;
        }

        Ok(())
    }
}
