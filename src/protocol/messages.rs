//! # Fee-grant Messages
//!
//! Request and response payloads of the fee-grant service, its server trait,
//! its service descriptor and a typed client over a [`QueryInvoker`].
//!
//! The allowance inside [`MsgGrantFeeAllowance`] travels as an [`Any`]. Its
//! concrete type is resolved through the [`TypeRegistry`] in the call
//! context, and an unregistered allowance is carried through untouched.

use std::sync::Arc;

use crate::core::any::{Any, DynMessage, Named, TypeRegistry};
use crate::core::wire::{self, Message, Reader, WireType, Writer};
use crate::error::{FormatError, RegistrationError, Result};
use crate::protocol::context::QueryContext;
use crate::protocol::invoker::QueryInvoker;
use crate::protocol::service::{MethodDesc, ServiceDesc};

/// Route name of the fee-grant service.
pub const FEE_GRANT_SERVICE: &str = "feegrant";

pub const GRANT_FEE_ALLOWANCE: &str = "GrantFeeAllowance";
pub const REVOKE_FEE_ALLOWANCE: &str = "RevokeFeeAllowance";

/// Grant `grantee` an allowance to spend fees from `granter`'s account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MsgGrantFeeAllowance {
    pub granter: Vec<u8>,
    pub grantee: Vec<u8>,
    pub allowance: Option<Any>,
}

impl MsgGrantFeeAllowance {
    pub fn granter(&self) -> &[u8] {
        &self.granter
    }

    pub fn grantee(&self) -> &[u8] {
        &self.grantee
    }

    pub fn allowance(&self) -> Option<&Any> {
        self.allowance.as_ref()
    }

    /// Decode the allowance through `registry`.
    ///
    /// `Ok(None)` when no allowance is attached. An unregistered type URL is
    /// an `UnknownType` resolution error.
    pub fn allowance_with(&self, registry: &TypeRegistry) -> Result<Option<Box<dyn DynMessage>>> {
        self.allowance
            .as_ref()
            .map(|any| registry.resolve(any))
            .transpose()
    }
}

impl Message for MsgGrantFeeAllowance {
    fn encoded_len(&self) -> usize {
        let mut n = wire::bytes_field_len(1, self.granter.len())
            + wire::bytes_field_len(2, self.grantee.len());
        if let Some(allowance) = &self.allowance {
            n += wire::message_field_len(3, allowance.encoded_len());
        }
        n
    }

    fn write_to(&self, w: &mut Writer<'_>) -> std::result::Result<(), FormatError> {
        if let Some(allowance) = &self.allowance {
            w.put_message_field(3, allowance)?;
        }
        w.put_bytes_field(2, &self.grantee)?;
        w.put_bytes_field(1, &self.granter)
    }

    fn merge_field(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        r: &mut Reader<'_>,
    ) -> std::result::Result<bool, FormatError> {
        match field_number {
            1 => self.granter = r.read_bytes_field("granter", wire_type)?,
            2 => self.grantee = r.read_bytes_field("grantee", wire_type)?,
            3 => r.read_message_field(
                "allowance",
                wire_type,
                self.allowance.get_or_insert_with(Any::default),
            )?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Named for MsgGrantFeeAllowance {
    const TYPE_URL: &'static str = "/cosmos.feegrant.v1beta1.MsgGrantFeeAllowance";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MsgGrantFeeAllowanceResponse {}

impl Message for MsgGrantFeeAllowanceResponse {
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

impl Named for MsgGrantFeeAllowanceResponse {
    const TYPE_URL: &'static str = "/cosmos.feegrant.v1beta1.MsgGrantFeeAllowanceResponse";
}

/// Remove any allowance `granter` has given `grantee`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MsgRevokeFeeAllowance {
    pub granter: Vec<u8>,
    pub grantee: Vec<u8>,
}

impl MsgRevokeFeeAllowance {
    pub fn granter(&self) -> &[u8] {
        &self.granter
    }

    pub fn grantee(&self) -> &[u8] {
        &self.grantee
    }
}

impl Message for MsgRevokeFeeAllowance {
    fn encoded_len(&self) -> usize {
        wire::bytes_field_len(1, self.granter.len()) + wire::bytes_field_len(2, self.grantee.len())
    }

    fn write_to(&self, w: &mut Writer<'_>) -> std::result::Result<(), FormatError> {
        w.put_bytes_field(2, &self.grantee)?;
        w.put_bytes_field(1, &self.granter)
    }

    fn merge_field(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        r: &mut Reader<'_>,
    ) -> std::result::Result<bool, FormatError> {
        match field_number {
            1 => self.granter = r.read_bytes_field("granter", wire_type)?,
            2 => self.grantee = r.read_bytes_field("grantee", wire_type)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Named for MsgRevokeFeeAllowance {
    const TYPE_URL: &'static str = "/cosmos.feegrant.v1beta1.MsgRevokeFeeAllowance";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MsgRevokeFeeAllowanceResponse {}

impl Message for MsgRevokeFeeAllowanceResponse {
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

impl Named for MsgRevokeFeeAllowanceResponse {
    const TYPE_URL: &'static str = "/cosmos.feegrant.v1beta1.MsgRevokeFeeAllowanceResponse";
}

/// Register the four fee-grant payload types.
pub fn register_fee_grant_types(
    registry: &mut TypeRegistry,
) -> std::result::Result<(), RegistrationError> {
    registry
        .register::<MsgGrantFeeAllowance>()?
        .register::<MsgGrantFeeAllowanceResponse>()?
        .register::<MsgRevokeFeeAllowance>()?
        .register::<MsgRevokeFeeAllowanceResponse>()?;
    Ok(())
}

/// Server side of the fee-grant service.
pub trait FeeGrantMsgServer: Send + Sync {
    fn grant_fee_allowance(
        &self,
        ctx: &QueryContext,
        request: MsgGrantFeeAllowance,
    ) -> Result<MsgGrantFeeAllowanceResponse>;

    fn revoke_fee_allowance(
        &self,
        ctx: &QueryContext,
        request: MsgRevokeFeeAllowance,
    ) -> Result<MsgRevokeFeeAllowanceResponse>;
}

/// Descriptor for registering a [`FeeGrantMsgServer`] with a router.
pub fn fee_grant_service() -> ServiceDesc<dyn FeeGrantMsgServer> {
    ServiceDesc::new(FEE_GRANT_SERVICE)
        .with_method(MethodDesc::<dyn FeeGrantMsgServer>::unary(
            GRANT_FEE_ALLOWANCE,
            |srv, ctx, req: MsgGrantFeeAllowance| srv.grant_fee_allowance(ctx, req),
        ))
        .with_method(MethodDesc::<dyn FeeGrantMsgServer>::unary(
            REVOKE_FEE_ALLOWANCE,
            |srv, ctx, req: MsgRevokeFeeAllowance| srv.revoke_fee_allowance(ctx, req),
        ))
}

/// Typed calls to the fee-grant service through an invoker.
#[derive(Debug, Clone)]
pub struct FeeGrantMsgClient {
    invoker: Arc<QueryInvoker>,
}

impl FeeGrantMsgClient {
    pub fn new(invoker: Arc<QueryInvoker>) -> Self {
        Self { invoker }
    }

    pub fn grant_fee_allowance(
        &self,
        request: &MsgGrantFeeAllowance,
    ) -> Result<MsgGrantFeeAllowanceResponse> {
        self.invoker
            .invoke_message(&method_path(GRANT_FEE_ALLOWANCE), request)
    }

    pub fn revoke_fee_allowance(
        &self,
        request: &MsgRevokeFeeAllowance,
    ) -> Result<MsgRevokeFeeAllowanceResponse> {
        self.invoker
            .invoke_message(&method_path(REVOKE_FEE_ALLOWANCE), request)
    }
}

fn method_path(method: &str) -> String {
    format!("/{FEE_GRANT_SERVICE}/{method}")
}
