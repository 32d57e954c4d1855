//! # Wire Codec
//!
//! Field-by-field (de)serialization of tag/length/value messages.
//!
//! ## Wire Format
//! ```text
//! field   = tag payload
//! tag     = varint(field_number << 3 | wire_type)
//! payload = varint | fixed64 | varint(len) bytes[len] | group | fixed32
//! ```
//!
//! Encoding is back-to-front: [`Message::encode`] sizes the output with
//! [`Message::encoded_len`], allocates once, and a [`Writer`] fills the buffer
//! from the end. Implementations therefore write their highest field number
//! first, and the fields end up in ascending order.
//!
//! Zero-valued scalars and empty byte/string fields are never written. After a
//! round trip an empty field and an absent field look the same.
//!
//! ## Example
//! ```rust
//! use wire_router::core::wire::{self, Message, Reader, WireType, Writer};
//! use wire_router::error::FormatError;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Ping {
//!     seq: u64,
//!     note: String,
//! }
//!
//! impl Message for Ping {
//!     fn encoded_len(&self) -> usize {
//!         wire::uint64_field_len(1, self.seq) + wire::string_field_len(2, &self.note)
//!     }
//!
//!     fn write_to(&self, w: &mut Writer<'_>) -> Result<(), FormatError> {
//!         w.put_string_field(2, &self.note)?;
//!         w.put_uint64_field(1, self.seq)
//!     }
//!
//!     fn merge_field(
//!         &mut self,
//!         field_number: u32,
//!         wire_type: WireType,
//!         r: &mut Reader<'_>,
//!     ) -> Result<bool, FormatError> {
//!         match field_number {
//!             1 => self.seq = r.read_uint64_field("seq", wire_type)?,
//!             2 => self.note = r.read_string_field("note", wire_type)?,
//!             _ => return Ok(false),
//!         }
//!         Ok(true)
//!     }
//! }
//!
//! let ping = Ping { seq: 7, note: "hi".into() };
//! let bytes = ping.encode().unwrap();
//! assert_eq!(bytes, [0x08, 0x07, 0x12, 0x02, b'h', b'i']);
//! assert_eq!(Ping::decode(&bytes).unwrap(), ping);
//! ```

use std::fmt::Debug;

use crate::core::skip::{self, checked_length};
use crate::core::varint;
use crate::error::FormatError;

/// How a field's payload is framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            other => Err(FormatError::IllegalWireType(other)),
        }
    }
}

/// Compose the tag key for `field_number` and `wire_type`.
#[inline]
pub const fn tag_key(field_number: u32, wire_type: WireType) -> u64 {
    ((field_number as u64) << 3) | wire_type as u64
}

/// Split a tag key into its raw field number and wire type.
///
/// The field number is not validated here; [`Reader::read_tag`] does that.
#[inline]
pub fn split_key(key: u64) -> Result<(u64, WireType), FormatError> {
    let wire_type = WireType::try_from((key & 0x7) as u8)?;
    Ok((key >> 3, wire_type))
}

/// Encoded length of the tag for `field_number`.
#[inline]
pub fn tag_len(field_number: u32) -> usize {
    varint::encoded_len(u64::from(field_number) << 3)
}

/// Size of a length-delimited field with a `len`-byte payload, or 0 if omitted.
#[inline]
pub fn bytes_field_len(field_number: u32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    tag_len(field_number) + varint::encoded_len(len as u64) + len
}

#[inline]
pub fn string_field_len(field_number: u32, value: &str) -> usize {
    bytes_field_len(field_number, value.len())
}

#[inline]
pub fn uint64_field_len(field_number: u32, value: u64) -> usize {
    if value == 0 {
        return 0;
    }
    tag_len(field_number) + varint::encoded_len(value)
}

#[inline]
pub fn bool_field_len(field_number: u32, value: bool) -> usize {
    if value {
        tag_len(field_number) + 1
    } else {
        0
    }
}

/// Size of a present submessage field whose body is `inner_len` bytes.
///
/// Unlike byte fields, a present submessage is written even when empty.
#[inline]
pub fn message_field_len(field_number: u32, inner_len: usize) -> usize {
    tag_len(field_number) + varint::encoded_len(inner_len as u64) + inner_len
}

/// Back-to-front writer over a pre-sized buffer.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        let pos = buf.len();
        Self { buf, pos }
    }

    /// Bytes written so far, counted from the end of the buffer.
    pub fn written(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes still free at the front of the buffer.
    pub fn remaining(&self) -> usize {
        self.pos
    }

    pub fn put_raw(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        if bytes.len() > self.pos {
            return Err(FormatError::BufferOverflow {
                needed: bytes.len(),
                available: self.pos,
            });
        }
        let start = self.pos - bytes.len();
        self.buf[start..self.pos].copy_from_slice(bytes);
        self.pos = start;
        Ok(())
    }

    pub fn put_varint(&mut self, value: u64) -> Result<(), FormatError> {
        self.pos = varint::encode_backward(self.buf, self.pos, value)?;
        Ok(())
    }

    pub fn put_tag(&mut self, field_number: u32, wire_type: WireType) -> Result<(), FormatError> {
        self.put_varint(tag_key(field_number, wire_type))
    }

    /// Write a length-delimited field. Empty payloads are omitted.
    pub fn put_bytes_field(&mut self, field_number: u32, bytes: &[u8]) -> Result<(), FormatError> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.put_raw(bytes)?;
        self.put_varint(bytes.len() as u64)?;
        self.put_tag(field_number, WireType::LengthDelimited)
    }

    pub fn put_string_field(&mut self, field_number: u32, value: &str) -> Result<(), FormatError> {
        self.put_bytes_field(field_number, value.as_bytes())
    }

    pub fn put_uint64_field(&mut self, field_number: u32, value: u64) -> Result<(), FormatError> {
        if value == 0 {
            return Ok(());
        }
        self.put_varint(value)?;
        self.put_tag(field_number, WireType::Varint)
    }

    pub fn put_bool_field(&mut self, field_number: u32, value: bool) -> Result<(), FormatError> {
        self.put_uint64_field(field_number, u64::from(value))
    }

    pub fn put_fixed64_field(&mut self, field_number: u32, value: u64) -> Result<(), FormatError> {
        self.put_raw(&value.to_le_bytes())?;
        self.put_tag(field_number, WireType::Fixed64)
    }

    pub fn put_fixed32_field(&mut self, field_number: u32, value: u32) -> Result<(), FormatError> {
        self.put_raw(&value.to_le_bytes())?;
        self.put_tag(field_number, WireType::Fixed32)
    }

    /// Encode `message` into the suffix just before the cursor, then its
    /// length prefix and tag.
    pub fn put_message_field<M: Message>(
        &mut self,
        field_number: u32,
        message: &M,
    ) -> Result<(), FormatError> {
        let before = self.written();
        message.write_to(self)?;
        let size = self.written() - before;
        self.put_varint(size as u64)?;
        self.put_tag(field_number, WireType::LengthDelimited)
    }
}

/// Forward cursor over an encoded message.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_varint(&mut self) -> Result<u64, FormatError> {
        let tail = self.buf.get(self.pos..).ok_or(FormatError::TruncatedInput)?;
        let (value, n) = varint::decode(tail)?;
        self.pos += n;
        Ok(value)
    }

    /// Read and validate a top-level tag.
    ///
    /// # Errors
    /// [`FormatError::IllegalTag`] for field number 0, field numbers that do
    /// not fit a positive `i32`, and a bare end-group tag.
    pub fn read_tag(&mut self) -> Result<(u32, WireType), FormatError> {
        let key = self.read_varint()?;
        let wire_bits = (key & 0x7) as u8;
        let raw_field = key >> 3;
        let illegal = FormatError::IllegalTag {
            field_number: raw_field,
            wire_type: wire_bits,
        };

        if wire_bits == WireType::EndGroup as u8 {
            return Err(illegal);
        }
        let field_number = match i32::try_from(raw_field) {
            Ok(n) if n > 0 => n as u32,
            _ => return Err(illegal),
        };
        let wire_type = WireType::try_from(wire_bits)?;
        Ok((field_number, wire_type))
    }

    /// Borrow the next length-delimited payload.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], FormatError> {
        let len = checked_length(self.read_varint()?)?;
        let end = self.pos.checked_add(len).ok_or(FormatError::NegativeLength)?;
        let payload = self.buf.get(self.pos..end).ok_or(FormatError::TruncatedInput)?;
        self.pos = end;
        Ok(payload)
    }

    pub fn read_fixed64(&mut self) -> Result<u64, FormatError> {
        let bytes = self.take::<8>()?;
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn read_fixed32(&mut self) -> Result<u32, FormatError> {
        let bytes = self.take::<4>()?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a bytes field, replacing any earlier value.
    pub fn read_bytes_field(
        &mut self,
        field: &'static str,
        wire_type: WireType,
    ) -> Result<Vec<u8>, FormatError> {
        expect_wire_type(field, wire_type, WireType::LengthDelimited)?;
        Ok(self.read_length_delimited()?.to_vec())
    }

    pub fn read_string_field(
        &mut self,
        field: &'static str,
        wire_type: WireType,
    ) -> Result<String, FormatError> {
        expect_wire_type(field, wire_type, WireType::LengthDelimited)?;
        let payload = self.read_length_delimited()?;
        std::str::from_utf8(payload)
            .map(str::to_owned)
            .map_err(|_| FormatError::InvalidUtf8 { field })
    }

    pub fn read_uint64_field(
        &mut self,
        field: &'static str,
        wire_type: WireType,
    ) -> Result<u64, FormatError> {
        expect_wire_type(field, wire_type, WireType::Varint)?;
        self.read_varint()
    }

    pub fn read_bool_field(
        &mut self,
        field: &'static str,
        wire_type: WireType,
    ) -> Result<bool, FormatError> {
        Ok(self.read_uint64_field(field, wire_type)? != 0)
    }

    pub fn read_fixed64_field(
        &mut self,
        field: &'static str,
        wire_type: WireType,
    ) -> Result<u64, FormatError> {
        expect_wire_type(field, wire_type, WireType::Fixed64)?;
        self.read_fixed64()
    }

    pub fn read_fixed32_field(
        &mut self,
        field: &'static str,
        wire_type: WireType,
    ) -> Result<u32, FormatError> {
        expect_wire_type(field, wire_type, WireType::Fixed32)?;
        self.read_fixed32()
    }

    /// Merge a submessage field into `dst`, keeping fields the payload does not set.
    pub fn read_message_field<M: Message>(
        &mut self,
        field: &'static str,
        wire_type: WireType,
        dst: &mut M,
    ) -> Result<(), FormatError> {
        expect_wire_type(field, wire_type, WireType::LengthDelimited)?;
        let payload = self.read_length_delimited()?;
        dst.merge(payload)
    }

    /// Skip the payload of the field whose tag was just read.
    pub fn skip(&mut self, wire_type: WireType) -> Result<(), FormatError> {
        self.pos = skip::skip(self.buf, self.pos, wire_type)?;
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let end = self.pos.checked_add(N).ok_or(FormatError::TruncatedInput)?;
        let slice = self.buf.get(self.pos..end).ok_or(FormatError::TruncatedInput)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.pos = end;
        Ok(out)
    }
}

fn expect_wire_type(
    field: &'static str,
    actual: WireType,
    expected: WireType,
) -> Result<(), FormatError> {
    if actual != expected {
        return Err(FormatError::WrongWireType {
            field,
            wire_type: actual as u8,
        });
    }
    Ok(())
}

/// A message with a hand-written field layout.
pub trait Message: Debug + Default + Send + Sync {
    /// Exact number of bytes [`Message::write_to`] will produce.
    fn encoded_len(&self) -> usize;

    /// Write every non-default field, highest field number first.
    fn write_to(&self, w: &mut Writer<'_>) -> Result<(), FormatError>;

    /// Consume the payload of one field. Returns `false` for an unknown field
    /// number without touching the reader; the caller then skips it.
    fn merge_field(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        r: &mut Reader<'_>,
    ) -> Result<bool, FormatError>;

    /// Encode into a buffer of exactly `encoded_len()` bytes.
    fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let expected = self.encoded_len();
        let mut buf = vec![0u8; expected];
        let mut w = Writer::new(&mut buf);
        self.write_to(&mut w)?;
        let written = w.written();
        if written != expected {
            return Err(FormatError::SizeMismatch { expected, written });
        }
        Ok(buf)
    }

    /// Merge the fields in `buf` into `self`.
    ///
    /// Not atomic: on error, fields decoded before the failure stay assigned.
    fn merge(&mut self, buf: &[u8]) -> Result<(), FormatError> {
        let mut r = Reader::new(buf);
        while !r.is_empty() {
            let (field_number, wire_type) = r.read_tag()?;
            if !self.merge_field(field_number, wire_type, &mut r)? {
                r.skip(wire_type)?;
            }
        }
        Ok(())
    }

    fn decode(buf: &[u8]) -> Result<Self, FormatError>
    where
        Self: Sized,
    {
        let mut message = Self::default();
        message.merge(buf)?;
        Ok(message)
    }
}
