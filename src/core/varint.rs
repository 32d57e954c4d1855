//! # Varint Codec
//!
//! Unsigned 64-bit integers in 7-bit little-endian groups. Every byte but the
//! last carries the continuation bit (`0x80`).
//!
//! ```text
//! 150 = 0b1001_0110  ->  [0x96, 0x01]
//! ```

use crate::error::FormatError;

/// Longest possible encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7F;

/// Number of bytes `value` occupies once encoded.
#[inline]
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Encode `value` into a fresh buffer.
pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    encode_into(value, &mut out);
    out
}

/// Append the encoding of `value` to `out`.
pub fn encode_into(mut value: u64, out: &mut Vec<u8>) {
    while value >= u64::from(CONTINUATION) {
        out.push((value as u8 & PAYLOAD_MASK) | CONTINUATION);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Write the encoding of `value` so that it ends right before `end`.
///
/// Returns the offset of the first written byte. Used by the back-to-front
/// encoder, which always sizes `buf` up front.
///
/// # Errors
/// Returns [`FormatError::BufferOverflow`] if `end` lies past the buffer or
/// fewer than `encoded_len(value)` bytes precede it.
pub fn encode_backward(buf: &mut [u8], end: usize, mut value: u64) -> Result<usize, FormatError> {
    let needed = encoded_len(value);
    if end > buf.len() {
        return Err(FormatError::BufferOverflow {
            needed,
            available: buf.len(),
        });
    }
    if needed > end {
        return Err(FormatError::BufferOverflow {
            needed,
            available: end,
        });
    }

    let start = end - needed;
    let mut i = start;
    while value >= u64::from(CONTINUATION) {
        buf[i] = (value as u8 & PAYLOAD_MASK) | CONTINUATION;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    Ok(start)
}

/// Decode a varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
/// - [`FormatError::IntegerOverflow`] if an eleventh group would be read
/// - [`FormatError::TruncatedInput`] if `buf` ends before a terminating byte
pub fn decode(buf: &[u8]) -> Result<(u64, usize), FormatError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut pos = 0usize;

    loop {
        if shift >= 64 {
            return Err(FormatError::IntegerOverflow);
        }
        let byte = *buf.get(pos).ok_or(FormatError::TruncatedInput)?;
        pos += 1;
        value |= u64::from(byte & PAYLOAD_MASK) << shift;
        if byte < CONTINUATION {
            return Ok((value, pos));
        }
        shift += 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [u64; 7] = [0, 1, 127, 128, 16383, (1 << 63) - 1, u64::MAX];

    #[test]
    fn test_roundtrip_reports_consumed_length() {
        for &value in &SAMPLES {
            let bytes = encode(value);
            assert_eq!(bytes.len(), encoded_len(value));
            assert_eq!(decode(&bytes), Ok((value, bytes.len())), "value {value}");
        }
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7F]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(150), vec![0x96, 0x01]);
        assert_eq!(encode(16383), vec![0xFF, 0x7F]);
        assert_eq!(encode(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn test_missing_terminator_is_truncated() {
        for &value in &SAMPLES {
            let mut bytes = encode(value);
            bytes.pop();
            assert_eq!(decode(&bytes), Err(FormatError::TruncatedInput));
        }
    }

    #[test]
    fn test_eleven_groups_overflow() {
        let bytes = [0xFF; 11];
        assert_eq!(decode(&bytes), Err(FormatError::IntegerOverflow));

        // Ten continuation bytes hit the shift limit before running out of input.
        let bytes = [0x80; 10];
        assert_eq!(decode(&bytes), Err(FormatError::IntegerOverflow));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        assert_eq!(decode(&[0xAC, 0x02, 0xFF, 0xFF]), Ok((300, 2)));
    }

    #[test]
    fn test_encode_backward_fills_suffix() {
        let mut buf = [0u8; 4];
        let start = encode_backward(&mut buf, 4, 300).expect("fits");
        assert_eq!(start, 2);
        assert_eq!(&buf[2..], &[0xAC, 0x02]);
    }

    #[test]
    fn test_encode_backward_rejects_short_buffer() {
        let mut buf = [0u8; 1];
        assert_eq!(
            encode_backward(&mut buf, 1, 300),
            Err(FormatError::BufferOverflow {
                needed: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_encode_backward_rejects_end_past_buffer() {
        let mut buf = [0u8; 2];
        assert_eq!(
            encode_backward(&mut buf, 5, 1),
            Err(FormatError::BufferOverflow {
                needed: 1,
                available: 2
            })
        );
        assert_eq!(buf, [0, 0]);
        assert_eq!(encode_backward(&mut buf, 2, 1), Ok(1));
    }
}
