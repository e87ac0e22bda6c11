use crate::{decode::DecodeError, decode::MiDecoder, utils::bgr0_to_rgb, HeaderInfo};
use alloc::vec::Vec;
use itertools::Itertools;

impl MiDecoder {
    /// Decodes a `.mi` image, appending its pixels to `w` as RGB8 bytes.
    pub fn decode_to_vec(data: &[u8], w: &mut Vec<u8>) -> Result<HeaderInfo, DecodeError> {
        let (header, records) = Self::split(data)?;

        w.reserve(records.len() / 4 * 3);
        for (b, g, r, reserved) in records.iter().copied().tuples() {
            w.extend_from_slice(&bgr0_to_rgb([b, g, r, reserved]));
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_reserved_byte() {
        #[rustfmt::skip]
        let data = [
            2, 0, 0, 0,   1, 0, 0, 0,
            0x00, 0x00, 0xFF, 0x00,
            0x30, 0x20, 0x10, 0xAB,
        ];

        let mut rgb = Vec::new();
        let header = MiDecoder::decode_to_vec(&data, &mut rgb).unwrap();

        assert_eq!((header.width, header.height), (2, 1));
        assert_eq!(rgb, [0xFF, 0x00, 0x00, 0x10, 0x20, 0x30]);
    }

    #[test]
    fn leaves_output_untouched_on_error() {
        let mut rgb = vec![1, 2, 3];
        assert!(MiDecoder::decode_to_vec(&[1, 0, 0, 0, 1, 0, 0, 0, 0], &mut rgb).is_err());
        assert_eq!(rgb, [1, 2, 3]);
    }
}
