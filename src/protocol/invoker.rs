//! # In-process Call Adapter
//!
//! Turns full method paths of the form `/<service>/<method>` into router
//! dispatches. Only single request / single response calls are modelled.

use std::sync::Arc;

use crate::core::wire::Message;
use crate::error::{DispatchError, RegistrationError, Result};
use crate::protocol::context::QueryContext;
use crate::protocol::router::{Querier, QueryRouter};
use crate::protocol::service::ServiceDesc;

#[derive(Debug, Default)]
pub struct QueryInvoker {
    router: QueryRouter,
    ctx: QueryContext,
}

impl QueryInvoker {
    /// Invoker with an empty router.
    pub fn new(ctx: QueryContext) -> Self {
        Self::with_router(QueryRouter::new(), ctx)
    }

    pub fn with_router(router: QueryRouter, ctx: QueryContext) -> Self {
        Self { router, ctx }
    }

    pub fn router(&self) -> &QueryRouter {
        &self.router
    }

    pub fn context(&self) -> &QueryContext {
        &self.ctx
    }

    pub fn add_route(
        &mut self,
        path: &str,
        querier: Querier,
    ) -> std::result::Result<&mut Self, RegistrationError> {
        self.router.add_route(path, querier)?;
        Ok(self)
    }

    pub fn register_service<S>(
        &mut self,
        desc: ServiceDesc<S>,
        implementation: Arc<S>,
    ) -> std::result::Result<&mut Self, RegistrationError>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.router.register_service(desc, implementation)?;
        Ok(self)
    }

    /// Dispatch raw request bytes to `full_path`.
    ///
    /// # Errors
    /// - [`DispatchError::MalformedPath`] unless the path splits into exactly
    ///   three `/`-separated segments
    /// - [`DispatchError::HandlerNotFound`] if the service is not routed
    /// - whatever the handler returns
    pub fn invoke(&self, full_path: &str, request: &[u8]) -> Result<Vec<u8>> {
        let segments: Vec<&str> = full_path.split('/').collect();
        if segments.len() != 3 {
            return Err(DispatchError::MalformedPath(full_path.to_owned()).into());
        }
        self.router
            .dispatch(&self.ctx, segments[1], &segments[2..], request)
    }

    /// Encode `request`, invoke, and decode the reply as `Res`.
    pub fn invoke_message<Req, Res>(&self, full_path: &str, request: &Req) -> Result<Res>
    where
        Req: Message,
        Res: Message,
    {
        let bytes = request.encode()?;
        let reply = self.invoke(full_path, &bytes)?;
        Ok(Res::decode(&reply)?)
    }

    /// Streaming calls are not supported by the in-process adapter.
    pub fn new_stream(&self, full_path: &str) -> Result<()> {
        tracing::debug!(path = full_path, "Rejected streaming call");
        Err(DispatchError::Unsupported("streaming calls").into())
    }
}
