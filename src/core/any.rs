//! # Any Container and Type Registry
//!
//! [`Any`] pairs a type URL with the encoded bytes of a message whose schema
//! the container does not know. A [`TypeRegistry`] maps type URLs to
//! constructors so the bytes can be turned back into a concrete value.
//!
//! The registry is an ordinary value built at startup and shared through
//! [`QueryContext`](crate::protocol::QueryContext). Nothing is registered
//! implicitly.
//!
//! An `Any` whose URL is not registered stays opaque. It can still be stored,
//! forwarded, and re-encoded byte for byte.

use std::any::Any as StdAny;
use std::collections::HashMap;
use std::fmt::Debug;

use bytes::Bytes;

use crate::core::wire::{self, Message, Reader, WireType, Writer};
use crate::error::{FormatError, RegistrationError, ResolutionError, Result};

/// A message type with a stable type URL.
pub trait Named: Message + 'static {
    const TYPE_URL: &'static str;
}

/// Object-safe view of a resolved message.
pub trait DynMessage: Debug + Send + Sync {
    fn type_url(&self) -> &'static str;
    fn encode_to_vec(&self) -> std::result::Result<Vec<u8>, FormatError>;
    fn as_any(&self) -> &dyn StdAny;
    fn into_any(self: Box<Self>) -> Box<dyn StdAny>;
}

impl<M: Named> DynMessage for M {
    fn type_url(&self) -> &'static str {
        M::TYPE_URL
    }

    fn encode_to_vec(&self) -> std::result::Result<Vec<u8>, FormatError> {
        self.encode()
    }

    fn as_any(&self) -> &dyn StdAny {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn StdAny> {
        self
    }
}

/// Type-erased message: `type_url` (field 1) and `value` (field 2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Any {
    pub type_url: String,
    pub value: Bytes,
}

impl Any {
    pub fn new(type_url: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
        }
    }

    /// Encode `message` and tag it with its own type URL.
    pub fn pack<M: Named>(message: &M) -> std::result::Result<Self, FormatError> {
        Ok(Self {
            type_url: M::TYPE_URL.to_owned(),
            value: Bytes::from(message.encode()?),
        })
    }

    pub fn is<M: Named>(&self) -> bool {
        self.type_url == M::TYPE_URL
    }

    /// Decode the payload as `M` without consulting a registry.
    ///
    /// # Errors
    /// [`ResolutionError::TypeMismatch`] if the URL does not name `M`, or the
    /// format error from decoding.
    pub fn unpack<M: Named>(&self) -> Result<M> {
        if !self.is::<M>() {
            return Err(ResolutionError::TypeMismatch {
                expected: M::TYPE_URL.to_owned(),
                found: self.type_url.clone(),
            }
            .into());
        }
        Ok(M::decode(&self.value)?)
    }
}

impl Message for Any {
    fn encoded_len(&self) -> usize {
        wire::string_field_len(1, &self.type_url) + wire::bytes_field_len(2, self.value.len())
    }

    fn write_to(&self, w: &mut Writer<'_>) -> std::result::Result<(), FormatError> {
        w.put_bytes_field(2, &self.value)?;
        w.put_string_field(1, &self.type_url)
    }

    fn merge_field(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        r: &mut Reader<'_>,
    ) -> std::result::Result<bool, FormatError> {
        match field_number {
            1 => self.type_url = r.read_string_field("type_url", wire_type)?,
            2 => self.value = Bytes::from(r.read_bytes_field("value", wire_type)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

type Constructor = fn(&[u8]) -> std::result::Result<Box<dyn DynMessage>, FormatError>;

fn construct<M: Named>(bytes: &[u8]) -> std::result::Result<Box<dyn DynMessage>, FormatError> {
    let mut message = M::default();
    message.merge(bytes)?;
    Ok(Box::new(message))
}

/// Type URL → zero-value constructor.
#[derive(Default, Clone)]
pub struct TypeRegistry {
    constructors: HashMap<String, Constructor>,
}

impl Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("type_urls", &self.type_urls())
            .finish()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `M` under `M::TYPE_URL`.
    ///
    /// # Errors
    /// [`RegistrationError::DuplicateType`] if the URL is taken.
    pub fn register<M: Named>(&mut self) -> std::result::Result<&mut Self, RegistrationError> {
        if self.constructors.contains_key(M::TYPE_URL) {
            return Err(RegistrationError::DuplicateType(M::TYPE_URL.to_owned()));
        }
        self.constructors
            .insert(M::TYPE_URL.to_owned(), construct::<M> as Constructor);
        tracing::debug!(type_url = M::TYPE_URL, "Registered message type");
        Ok(self)
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.constructors.contains_key(type_url)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Registered type URLs in sorted order.
    pub fn type_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    /// Decode `any` into its registered concrete type.
    ///
    /// # Errors
    /// [`ResolutionError::UnknownType`] for an unregistered URL, or the
    /// format error from the concrete type's decoder.
    pub fn resolve(&self, any: &Any) -> Result<Box<dyn DynMessage>> {
        let constructor = self
            .constructors
            .get(&any.type_url)
            .ok_or_else(|| ResolutionError::UnknownType(any.type_url.clone()))?;
        Ok(constructor(&any.value)?)
    }

    /// Resolve and downcast to `M`.
    pub fn resolve_as<M: Named>(&self, any: &Any) -> Result<M> {
        let resolved = self.resolve(any)?;
        let found = resolved.type_url();
        resolved
            .into_any()
            .downcast::<M>()
            .map(|boxed| *boxed)
            .map_err(|_| {
                ResolutionError::TypeMismatch {
                    expected: M::TYPE_URL.to_owned(),
                    found: found.to_owned(),
                }
                .into()
            })
    }

    /// Encode `message` and pair it with its registered URL.
    ///
    /// # Errors
    /// [`ResolutionError::UnknownType`] if `M` was never registered.
    pub fn wrap<M: Named>(&self, message: &M) -> Result<Any> {
        if !self.contains(M::TYPE_URL) {
            return Err(ResolutionError::UnknownType(M::TYPE_URL.to_owned()).into());
        }
        Ok(Any::pack(message)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;

    #[derive(Debug, Default, PartialEq, Clone)]
    struct Limit {
        amount: u64,
    }

    impl Message for Limit {
        fn encoded_len(&self) -> usize {
            wire::uint64_field_len(1, self.amount)
        }

        fn write_to(&self, w: &mut Writer<'_>) -> std::result::Result<(), FormatError> {
            w.put_uint64_field(1, self.amount)
        }

        fn merge_field(
            &mut self,
            field_number: u32,
            wire_type: WireType,
            r: &mut Reader<'_>,
        ) -> std::result::Result<bool, FormatError> {
            if field_number == 1 {
                self.amount = r.read_uint64_field("amount", wire_type)?;
                return Ok(true);
            }
            Ok(false)
        }
    }

    impl Named for Limit {
        const TYPE_URL: &'static str = "/test.Limit";
    }

    #[derive(Debug, Default, PartialEq, Clone)]
    struct Other;

    impl Message for Other {
        fn encoded_len(&self) -> usize {
            0
        }

        fn write_to(&self, _w: &mut Writer<'_>) -> std::result::Result<(), FormatError> {
            Ok(())
        }

        fn merge_field(
            &mut self,
            _field_number: u32,
            _wire_type: WireType,
            _r: &mut Reader<'_>,
        ) -> std::result::Result<bool, FormatError> {
            Ok(false)
        }
    }

    impl Named for Other {
        const TYPE_URL: &'static str = "/test.Other";
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Limit>().expect("register");
        registry
    }

    #[test]
    fn test_wrap_then_resolve() {
        let registry = registry();
        let any = registry.wrap(&Limit { amount: 250 }).expect("wrap");
        assert_eq!(any.type_url, "/test.Limit");

        let resolved = registry.resolve(&any).expect("resolve");
        assert_eq!(resolved.type_url(), "/test.Limit");
        assert_eq!(
            resolved.as_any().downcast_ref::<Limit>(),
            Some(&Limit { amount: 250 })
        );
        assert_eq!(
            registry.resolve_as::<Limit>(&any).expect("resolve_as"),
            Limit { amount: 250 }
        );
    }

    #[test]
    fn test_unknown_type_stays_opaque() {
        let registry = registry();
        let any = Any::new("/test.Future", vec![0x08, 0x01, 0x7A, 0x00]);

        assert!(matches!(
            registry.resolve(&any),
            Err(ProtocolError::Resolution(ResolutionError::UnknownType(url))) if url == "/test.Future"
        ));

        let bytes = any.encode().expect("encode");
        assert_eq!(Any::decode(&bytes).expect("decode"), any);
    }

    #[test]
    fn test_wrap_requires_registration() {
        let registry = registry();
        assert!(matches!(
            registry.wrap(&Other),
            Err(ProtocolError::Resolution(ResolutionError::UnknownType(_)))
        ));
    }

    #[test]
    fn test_resolve_as_wrong_type() {
        let registry = registry();
        let any = Any::pack(&Limit { amount: 1 }).expect("pack");
        assert!(matches!(
            registry.resolve_as::<Other>(&any),
            Err(ProtocolError::Resolution(ResolutionError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        assert_eq!(
            registry.register::<Limit>().map(|_| ()),
            Err(RegistrationError::DuplicateType("/test.Limit".into()))
        );
        registry.register::<Other>().expect("register other");
        assert_eq!(registry.type_urls(), vec!["/test.Limit", "/test.Other"]);
    }

    #[test]
    fn test_unpack_checks_url() {
        let any = Any::pack(&Limit { amount: 3 }).expect("pack");
        assert!(any.is::<Limit>());
        assert_eq!(any.unpack::<Limit>().expect("unpack"), Limit { amount: 3 });
        assert!(any.unpack::<Other>().is_err());
    }

    #[test]
    fn test_resolve_surfaces_format_errors() {
        let registry = registry();
        let any = Any::new("/test.Limit", vec![0x08]);
        assert!(matches!(
            registry.resolve(&any),
            Err(ProtocolError::Format(FormatError::TruncatedInput))
        ));
    }
}
