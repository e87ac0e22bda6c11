use crate::{consts::MI_HEADER_LEN, HeaderInfo};
use byteorder::{ByteOrder, LittleEndian};
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
mod alloc_api;

#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum DecodeError {
    #[snafu(display("Input is {len} bytes long, too short for the 8-byte header"))]
    UnexpectedEof { len: usize },
    #[snafu(display("A {width}x{height} image is too large to decode on this platform"))]
    TooLarge { width: u32, height: u32 },
    #[snafu(display("Expected {expected} bytes for the image, but the input is {actual} bytes"))]
    LengthMismatch { expected: usize, actual: usize },
}

/// Stateless `.mi` decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiDecoder;

impl MiDecoder {
    /// Reads the width and height from the start of `data`.
    pub fn decode_header(data: &[u8]) -> Result<HeaderInfo, DecodeError> {
        ensure!(
            data.len() >= MI_HEADER_LEN,
            decode_error::UnexpectedEofSnafu { len: data.len() }
        );

        Ok(HeaderInfo {
            width: LittleEndian::read_u32(&data[0..4]),
            height: LittleEndian::read_u32(&data[4..8]),
        })
    }

    /// Parses the header and checks that `data` holds exactly the pixel records it announces.
    ///
    /// Returns the header and the `width * height * 4` bytes of `[B, G, R, 0x00]` pixel records
    /// that follow it.
    pub fn split(data: &[u8]) -> Result<(HeaderInfo, &[u8]), DecodeError> {
        let header = Self::decode_header(data)?;
        let HeaderInfo { width, height } = header;

        let Some(expected) = crate::encoded_len(width, height) else {
            return decode_error::TooLargeSnafu { width, height }.fail();
        };
        ensure!(
            data.len() == expected,
            decode_error::LengthMismatchSnafu {
                expected,
                actual: data.len()
            }
        );

        Ok((header, &data[MI_HEADER_LEN..]))
    }
}
