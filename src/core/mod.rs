//! # Core Codec Components
//!
//! Low-level tag/length/value encoding.
//!
//! This module provides the foundation for the router: every request and
//! response crosses it as bytes.
//!
//! ## Components
//! - **Varint**: 7-bit little-endian groups with a continuation bit
//! - **Skip**: depth-tracked skipping of fields a decoder does not know
//! - **Wire**: the `Message` trait, the backward `Writer` and the forward `Reader`
//! - **Any**: type-erased messages and the registry that resolves them
//!
//! ## Wire Format
//! ```text
//! [tag varint] [payload]   tag = field_number << 3 | wire_type
//! ```
//!
//! ## Safety
//! - Every length prefix is checked against the remaining input before slicing
//! - Varints longer than 10 bytes are rejected
//! - Group nesting is tracked iteratively, never by recursion

pub mod any;
pub mod skip;
pub mod varint;
pub mod wire;

pub use any::{Any, DynMessage, Named, TypeRegistry};
pub use wire::{Message, Reader, WireType, Writer};
