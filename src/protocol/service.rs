//! # Service Descriptors
//!
//! A [`ServiceDesc`] names a service and lists its methods in order. The
//! router registers the whole descriptor under the service name and resolves
//! the method inside that single route.
//!
//! ```rust
//! use std::sync::Arc;
//! use wire_router::protocol::{MethodDesc, QueryContext, QueryRouter, ServiceDesc};
//! use wire_router::core::Any;
//! use wire_router::error::Result;
//!
//! struct Echo;
//!
//! let desc = ServiceDesc::new("echo").with_method(MethodDesc::unary(
//!     "Any",
//!     |_svc: &Echo, _ctx: &QueryContext, req: Any| -> Result<Any> { Ok(req) },
//! ));
//!
//! let mut router = QueryRouter::new();
//! router.register_service(desc, Arc::new(Echo)).unwrap();
//! assert!(router.route("echo").is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::core::wire::Message;
use crate::error::Result;
use crate::protocol::context::QueryContext;

/// Raw method handler: request bytes in, response bytes out.
pub type MethodHandler<S> = Arc<dyn Fn(&S, &QueryContext, &[u8]) -> Result<Vec<u8>> + Send + Sync>;

/// One method of a service.
pub struct MethodDesc<S: ?Sized> {
    pub method_name: &'static str,
    pub handler: MethodHandler<S>,
}

impl<S: ?Sized + 'static> MethodDesc<S> {
    pub fn new(method_name: &'static str, handler: MethodHandler<S>) -> Self {
        Self {
            method_name,
            handler,
        }
    }

    /// Wrap a typed function: decode `Req`, call `f`, encode `Res`.
    pub fn unary<Req, Res, F>(method_name: &'static str, f: F) -> Self
    where
        Req: Message + 'static,
        Res: Message + 'static,
        F: Fn(&S, &QueryContext, Req) -> Result<Res> + Send + Sync + 'static,
    {
        let handler: MethodHandler<S> =
            Arc::new(move |svc: &S, ctx: &QueryContext, data: &[u8]| -> Result<Vec<u8>> {
                let request = Req::decode(data)?;
                let response = f(svc, ctx, request)?;
                Ok(response.encode()?)
            });
        Self::new(method_name, handler)
    }
}

impl<S: ?Sized> Clone for MethodDesc<S> {
    fn clone(&self) -> Self {
        Self {
            method_name: self.method_name,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S: ?Sized> fmt::Debug for MethodDesc<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDesc")
            .field("method_name", &self.method_name)
            .finish_non_exhaustive()
    }
}

/// A service name plus its ordered method table.
pub struct ServiceDesc<S: ?Sized> {
    pub service_name: &'static str,
    pub methods: Vec<MethodDesc<S>>,
}

impl<S: ?Sized + 'static> ServiceDesc<S> {
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodDesc<S>) -> Self {
        self.methods.push(method);
        self
    }

    /// Linear scan in declaration order; the first match wins.
    pub fn method(&self, method_name: &str) -> Option<&MethodDesc<S>> {
        self.methods.iter().find(|m| m.method_name == method_name)
    }

    pub fn method_names(&self) -> Vec<&'static str> {
        self.methods.iter().map(|m| m.method_name).collect()
    }
}

impl<S: ?Sized> fmt::Debug for ServiceDesc<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDesc")
            .field("service_name", &self.service_name)
            .field("methods", &self.methods)
            .finish()
    }
}
