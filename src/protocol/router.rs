//! # Query Router
//!
//! Maps a first-level path segment to a [`Querier`].
//!
//! Routes are added during startup through `&mut self` and the router is read
//! only afterwards. Once wrapped in an `Arc` it can be queried from any number
//! of threads without locking.
//!
//! A service descriptor registers a single route keyed by its service name;
//! the method segment is resolved inside that route's querier.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::error::{DispatchError, ProtocolError, RegistrationError, Result};
use crate::protocol::context::QueryContext;
use crate::protocol::service::ServiceDesc;
use crate::utils::metrics::{Metrics, Timer};

/// Route handler: context, remaining path segments, request bytes.
pub type Querier = Arc<dyn Fn(&QueryContext, &[&str], &[u8]) -> Result<Vec<u8>> + Send + Sync>;

/// Box a closure as a [`Querier`].
pub fn querier<F>(f: F) -> Querier
where
    F: Fn(&QueryContext, &[&str], &[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Route paths are non-empty ASCII alphanumeric strings.
pub fn is_alphanumeric(path: &str) -> bool {
    !path.is_empty() && path.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub struct QueryRouter {
    routes: HashMap<String, Querier>,
    config: RouterConfig,
    metrics: Arc<Metrics>,
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRouter")
            .field("routes", &self.routes())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryRouter {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            routes: HashMap::new(),
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Register `querier` under `path`.
    ///
    /// # Errors
    /// - [`RegistrationError::InvalidPathCharacters`] unless `path` is alphanumeric
    /// - [`RegistrationError::DuplicateRoute`] if `path` is taken
    pub fn add_route(
        &mut self,
        path: &str,
        querier: Querier,
    ) -> std::result::Result<&mut Self, RegistrationError> {
        if !is_alphanumeric(path) {
            return Err(RegistrationError::InvalidPathCharacters(path.to_owned()));
        }
        if self.routes.contains_key(path) {
            return Err(RegistrationError::DuplicateRoute(path.to_owned()));
        }

        self.routes.insert(path.to_owned(), querier);
        self.metrics.route_registered();
        debug!(route = path, "Registered query route");
        Ok(self)
    }

    /// Look up the querier for a first-level path.
    pub fn route(&self, path: &str) -> Option<&Querier> {
        self.routes.get(path)
    }

    /// Register every method of `desc` behind one route named after the service.
    ///
    /// # Errors
    /// Same as [`QueryRouter::add_route`] for `desc.service_name`.
    pub fn register_service<S>(
        &mut self,
        desc: ServiceDesc<S>,
        implementation: Arc<S>,
    ) -> std::result::Result<&mut Self, RegistrationError>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let service_name = desc.service_name;
        let methods = desc.method_names();
        let desc = Arc::new(desc);

        let service_querier = querier(move |ctx, path, data| {
            let method_name = path.first().copied().unwrap_or_default();
            match desc.method(method_name) {
                Some(method) => (method.handler)(&*implementation, ctx, data),
                None => Err(DispatchError::UnknownPath(method_name.to_owned()).into()),
            }
        });

        self.add_route(service_name, service_querier)?;
        info!(service = service_name, ?methods, "Registered query service");
        Ok(self)
    }

    /// Route `data` to `service` and run its querier with `suffix`.
    ///
    /// Applies the configured size limits and records metrics. Errors from
    /// the querier are returned unchanged.
    ///
    /// # Errors
    /// - [`DispatchError::HandlerNotFound`] if no route matches `service`
    /// - [`DispatchError::RequestTooLarge`] / [`DispatchError::ResponseTooLarge`]
    /// - anything the querier returns
    pub fn dispatch(
        &self,
        ctx: &QueryContext,
        service: &str,
        suffix: &[&str],
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let _timer = Timer::start("query_dispatch");
        self.metrics.query_received(data.len() as u64);

        let result = self.dispatch_inner(ctx, service, suffix, data);
        match &result {
            Ok(response) => {
                self.metrics.query_succeeded(response.len() as u64);
                debug!(
                    service,
                    method = suffix.first().copied().unwrap_or_default(),
                    request_bytes = data.len(),
                    response_bytes = response.len(),
                    "Query dispatched"
                );
            }
            Err(err) => {
                self.metrics.query_failed();
                warn!(
                    service,
                    method = suffix.first().copied().unwrap_or_default(),
                    error = %err,
                    "Query failed"
                );
            }
        }
        result
    }

    fn dispatch_inner(
        &self,
        ctx: &QueryContext,
        service: &str,
        suffix: &[&str],
        data: &[u8],
    ) -> Result<Vec<u8>> {
        if data.len() > self.config.max_request_size {
            return Err(DispatchError::RequestTooLarge {
                size: data.len(),
                limit: self.config.max_request_size,
            }
            .into());
        }

        let querier = self
            .route(service)
            .ok_or_else(|| ProtocolError::from(DispatchError::HandlerNotFound(service.to_owned())))?;
        let response = querier(ctx, suffix, data)?;

        if response.len() > self.config.max_response_size {
            return Err(DispatchError::ResponseTooLarge {
                size: response.len(),
                limit: self.config.max_response_size,
            }
            .into());
        }
        Ok(response)
    }

    /// Registered route names in sorted order.
    pub fn routes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
