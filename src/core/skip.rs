//! # Field Skipper
//!
//! Consumes the bytes of one field without interpreting them. Decoders hand
//! every unrecognized field number to [`skip`], which is what lets an old
//! decoder read messages written against a newer schema.
//!
//! Groups are tracked with an explicit depth counter instead of recursion, so
//! deeply nested input cannot exhaust the stack.

use crate::core::varint;
use crate::core::wire::{split_key, WireType};
use crate::error::FormatError;

/// Skip the payload of a field whose tag has already been consumed.
///
/// `pos` points at the first payload byte. Returns the position just past
/// the field. For [`WireType::StartGroup`] that is past the matching end-group
/// tag.
///
/// # Errors
/// - [`FormatError::TruncatedInput`] if the field runs past the end of `buf`
/// - [`FormatError::NegativeLength`] for a length prefix that is negative when
///   read as a signed integer
/// - [`FormatError::UnexpectedGroupEnd`] for an end-group with no open group
/// - [`FormatError::IllegalWireType`] for wire types 6 and 7 inside a group
pub fn skip(buf: &[u8], pos: usize, wire_type: WireType) -> Result<usize, FormatError> {
    let mut depth = 0u32;
    let mut pos = skip_payload(buf, pos, wire_type, &mut depth)?;

    while depth > 0 {
        let (key, n) = varint::decode(tail(buf, pos)?)?;
        pos += n;
        let (_, wire_type) = split_key(key)?;
        pos = skip_payload(buf, pos, wire_type, &mut depth)?;
    }

    Ok(pos)
}

/// Skip a whole field, tag included, starting at `pos`.
///
/// # Errors
/// Same as [`skip`], plus tag decoding failures.
pub fn skip_field(buf: &[u8], pos: usize) -> Result<usize, FormatError> {
    let (key, n) = varint::decode(tail(buf, pos)?)?;
    let (_, wire_type) = split_key(key)?;
    skip(buf, pos + n, wire_type)
}

fn skip_payload(
    buf: &[u8],
    pos: usize,
    wire_type: WireType,
    depth: &mut u32,
) -> Result<usize, FormatError> {
    match wire_type {
        WireType::Varint => {
            let (_, n) = varint::decode(tail(buf, pos)?)?;
            Ok(pos + n)
        }
        WireType::Fixed64 => advance(buf, pos, 8),
        WireType::LengthDelimited => {
            let (raw, n) = varint::decode(tail(buf, pos)?)?;
            let len = checked_length(raw)?;
            advance(buf, pos + n, len)
        }
        WireType::StartGroup => {
            *depth += 1;
            Ok(pos)
        }
        WireType::EndGroup => {
            if *depth == 0 {
                return Err(FormatError::UnexpectedGroupEnd);
            }
            *depth -= 1;
            Ok(pos)
        }
        WireType::Fixed32 => advance(buf, pos, 4),
    }
}

/// Interpret a decoded length prefix, rejecting values that are negative as `i64`.
pub(crate) fn checked_length(raw: u64) -> Result<usize, FormatError> {
    if (raw as i64) < 0 {
        return Err(FormatError::NegativeLength);
    }
    usize::try_from(raw).map_err(|_| FormatError::NegativeLength)
}

fn advance(buf: &[u8], pos: usize, len: usize) -> Result<usize, FormatError> {
    let end = pos.checked_add(len).ok_or(FormatError::NegativeLength)?;
    if end > buf.len() {
        return Err(FormatError::TruncatedInput);
    }
    Ok(end)
}

fn tail(buf: &[u8], pos: usize) -> Result<&[u8], FormatError> {
    buf.get(pos..).ok_or(FormatError::TruncatedInput)
}
