//! # Error Types
//!
//! Error handling for the wire codec and the query router.
//!
//! Errors are grouped by the phase in which they can occur:
//! - **Format Errors**: malformed bytes found while decoding or skipping a field
//! - **Registration Errors**: invalid or conflicting routes and type URLs at startup
//! - **Dispatch Errors**: per-call routing failures, never fatal to the process
//! - **Resolution Errors**: `Any` values whose type URL cannot be resolved
//!
//! [`ProtocolError`] wraps every family, so `?` works across layers.
//!
//! ## Example Usage
//! ```rust
//! use wire_router::core::varint;
//! use wire_router::error::{FormatError, ProtocolError, Result};
//!
//! fn first_value(bytes: &[u8]) -> Result<u64> {
//!     let (value, _) = varint::decode(bytes)?;
//!     Ok(value)
//! }
//!
//! assert_eq!(first_value(&[0x96, 0x01]).ok(), Some(150));
//! assert!(matches!(
//!     first_value(&[0x96]),
//!     Err(ProtocolError::Format(FormatError::TruncatedInput))
//! ));
//! ```

use std::io;
use thiserror::Error;

/// Malformed input found by the decoder, the field skipper, or the backward writer.
///
/// A decode that fails with one of these leaves its destination partially
/// populated. Callers must discard it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("integer overflow while decoding varint")]
    IntegerOverflow,

    #[error("negative length found during decoding")]
    NegativeLength,

    #[error("unexpected end of input")]
    TruncatedInput,

    #[error("unexpected end of group")]
    UnexpectedGroupEnd,

    #[error("illegal tag {field_number} (wire type {wire_type})")]
    IllegalTag { field_number: u64, wire_type: u8 },

    #[error("illegal wire type {0}")]
    IllegalWireType(u8),

    #[error("wrong wire type {wire_type} for field {field}")]
    WrongWireType { field: &'static str, wire_type: u8 },

    #[error("invalid UTF-8 in field {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("encode buffer overflow: needed {needed} bytes, {available} available")]
    BufferOverflow { needed: usize, available: usize },

    #[error("encoded size mismatch: expected {expected} bytes, wrote {written}")]
    SizeMismatch { expected: usize, written: usize },
}

/// Startup-time failures while populating a router or a type registry.
///
/// A router or registry whose construction returned one of these must not serve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("route {0} has already been initialized")]
    DuplicateRoute(String),

    #[error("route expressions can only contain alphanumeric characters: {0:?}")]
    InvalidPathCharacters(String),

    #[error("type URL {0} is already registered")]
    DuplicateType(String),
}

/// Per-call routing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown query path: {0}")]
    UnknownPath(String),

    #[error("unexpected method name {0}")]
    MalformedPath(String),

    #[error("handler not found for {0}")]
    HandlerNotFound(String),

    #[error("not supported: {0}")]
    Unsupported(&'static str),

    #[error("request too large: {size} bytes (limit {limit})")]
    RequestTooLarge { size: usize, limit: usize },

    #[error("response too large: {size} bytes (limit {limit})")]
    ResponseTooLarge { size: usize, limit: usize },
}

/// Failures resolving an `Any` into a concrete message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no concrete type registered for type URL {0}")]
    UnknownType(String),

    #[error("type URL mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

// ProtocolError is the primary error type for all codec and routing operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
