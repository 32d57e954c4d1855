//! # Query Routing
//!
//! Path-based dispatch of encoded requests to registered handlers.
//!
//! ## Components
//! - **Router**: first-level path → querier table with size limits and metrics
//! - **Service**: descriptors that bundle a service's methods behind one route
//! - **Invoker**: in-process adapter resolving `/<service>/<method>` paths
//! - **Context**: per-call block height and type registry
//! - **Messages**: the fee-grant payloads, server trait and client
//!
//! ## Lifecycle
//! 1. Build a `TypeRegistry` and a `QueryContext`
//! 2. Register routes and services through `&mut` access
//! 3. Share the router (or an invoker owning it) behind an `Arc`
//! 4. Dispatch from any thread

pub mod context;
pub mod invoker;
pub mod messages;
pub mod router;
pub mod service;


pub use context::QueryContext;
pub use invoker::QueryInvoker;
pub use router::{querier, Querier, QueryRouter};
pub use service::{MethodDesc, MethodHandler, ServiceDesc};
