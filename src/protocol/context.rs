use std::sync::Arc;

use crate::core::any::TypeRegistry;

/// Per-call context handed to every querier and method handler.
///
/// Cloning is cheap: the registry is shared.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    height: u64,
    registry: Arc<TypeRegistry>,
}

impl QueryContext {
    pub fn new(height: u64, registry: Arc<TypeRegistry>) -> Self {
        Self { height, registry }
    }

    /// Block height the query is evaluated at.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn with_height(&self, height: u64) -> Self {
        Self {
            height,
            registry: Arc::clone(&self.registry),
        }
    }
}
