use crate::utils::composite_on_black;
use alloc::vec::Vec;
use snafu::{ensure, OptionExt, Snafu};

#[derive(Debug, Snafu)]
pub enum RasterError {
    #[snafu(display(
        "Specified image dimensions don't match the buffer: {width} * {height} pixels with {channels} channels each, but {len} bytes were given"
    ))]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
        len: usize,
    },
}

fn check_len(width: usize, height: usize, channels: usize, len: usize) -> Result<(), RasterError> {
    let context = InvalidDimensionsSnafu {
        width,
        height,
        channels,
        len,
    };

    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(channels))
        .context(context)?;
    ensure!(expected == len, context);

    Ok(())
}

/// A straight-alpha RGBA8 raster borrowed from the caller, in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct SourceImage<'a> {
    width: usize,
    height: usize,
    rgba: &'a [u8],
}

impl<'a> SourceImage<'a> {
    pub fn new(width: usize, height: usize, rgba: &'a [u8]) -> Result<Self, RasterError> {
        check_len(width, height, 4, rgba.len())?;
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_rgba(&self) -> &'a [u8] {
        self.rgba
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + 'a {
        self.rgba
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Blends the image onto an opaque black background, dropping the alpha channel.
    ///
    /// Every colour channel becomes `round(channel * alpha / 255)`: opaque pixels pass through
    /// unchanged and fully transparent pixels turn black.
    pub fn composite_on_black(&self) -> CompositedImage {
        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        for pixel in self.pixels() {
            rgb.extend_from_slice(&composite_on_black(pixel));
        }

        CompositedImage {
            width: self.width,
            height: self.height,
            rgb,
        }
    }
}

/// An opaque RGB8 raster in row-major order, ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositedImage {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
}

impl CompositedImage {
    pub fn new(width: usize, height: usize, rgb: Vec<u8>) -> Result<Self, RasterError> {
        check_len(width, height, 3, rgb.len())?;
        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn into_rgb(self) -> Vec<u8> {
        self.rgb
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.rgb.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}
