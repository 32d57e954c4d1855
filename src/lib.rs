//! # wire-router
//!
//! A tag/length/value wire codec and a path-based query router.
//!
//! Requests arrive as a path such as `/feegrant/GrantFeeAllowance` plus
//! encoded argument bytes. The router resolves the service segment, the
//! service resolves its method, and the codec turns bytes into typed messages
//! and back.
//!
//! ## Layers
//! - [`core`]: varints, field skipping, the `Message` trait, `Any` and the type registry
//! - [`protocol`]: router, service descriptors, the in-process invoker and the fee-grant service
//! - [`config`]: TOML and environment configuration with validation
//! - [`utils`]: logging setup and dispatch metrics
//! - [`error`]: one error type per phase, wrapped by `ProtocolError`
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use wire_router::core::TypeRegistry;
//! use wire_router::protocol::messages::{
//!     fee_grant_service, register_fee_grant_types, FeeGrantMsgClient, FeeGrantMsgServer,
//!     MsgGrantFeeAllowance, MsgGrantFeeAllowanceResponse, MsgRevokeFeeAllowance,
//!     MsgRevokeFeeAllowanceResponse,
//! };
//! use wire_router::protocol::{QueryContext, QueryInvoker};
//! use wire_router::error::Result;
//!
//! struct Keeper;
//!
//! impl FeeGrantMsgServer for Keeper {
//!     fn grant_fee_allowance(
//!         &self,
//!         _ctx: &QueryContext,
//!         _req: MsgGrantFeeAllowance,
//!     ) -> Result<MsgGrantFeeAllowanceResponse> {
//!         Ok(MsgGrantFeeAllowanceResponse {})
//!     }
//!
//!     fn revoke_fee_allowance(
//!         &self,
//!         _ctx: &QueryContext,
//!         _req: MsgRevokeFeeAllowance,
//!     ) -> Result<MsgRevokeFeeAllowanceResponse> {
//!         Ok(MsgRevokeFeeAllowanceResponse {})
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut registry = TypeRegistry::new();
//! register_fee_grant_types(&mut registry)?;
//!
//! let mut invoker = QueryInvoker::new(QueryContext::new(1, Arc::new(registry)));
//! let server: Arc<dyn FeeGrantMsgServer> = Arc::new(Keeper);
//! invoker.register_service(fee_grant_service(), server)?;
//!
//! let client = FeeGrantMsgClient::new(Arc::new(invoker));
//! client.revoke_fee_allowance(&MsgRevokeFeeAllowance {
//!     granter: b"alice".to_vec(),
//!     grantee: b"bob".to_vec(),
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use config::{LoggingConfig, RouterConfig, WireRouterConfig};
pub use error::{ProtocolError, Result};
pub use protocol::{QueryContext, QueryInvoker, QueryRouter};
