//! Build-once cache of schema graphs keyed by record type.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tracing::{debug, trace};

use super::graph::SchemaGraph;
use crate::error::ConfigError;
use crate::registry::RuleRegistry;
use crate::traits::TypeRef;

/// Concurrent cache of built schema graphs.
///
/// Reads go straight to a [`DashMap`]. On a miss the caller takes a lock
/// specific to the requested type, so concurrent first use of one type
/// builds it once while builds of different types proceed in parallel.
/// Self-reference inside a build is resolved by the build's own memo and
/// never comes back through this cache.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: DashMap<TypeId, Arc<SchemaGraph>>,
    /// Guards creation of the per-type locks.
    locks: Mutex<HashMap<TypeId, Arc<Mutex<()>>>>,
    builds: AtomicUsize,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached graph for `ty`, building it on first use.
    pub fn get_or_build(
        &self,
        ty: TypeRef,
        registry: &RuleRegistry,
    ) -> Result<Arc<SchemaGraph>, ConfigError> {
        if let Some(graph) = self.get(ty.id()) {
            trace!(type_name = ty.name(), "Schema cache hit");
            return Ok(graph);
        }

        let type_lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(ty.id()).or_default())
        };
        let _guard = type_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished the build while we waited.
        if let Some(graph) = self.get(ty.id()) {
            return Ok(graph);
        }

        let graph = Arc::new(SchemaGraph::build(ty, registry)?);
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(
            type_name = ty.name(),
            nodes = graph.len(),
            "Built schema graph"
        );

        self.schemas.insert(ty.id(), Arc::clone(&graph));
        Ok(graph)
    }

    /// Cached graph for a type id, if already built.
    pub fn get(&self, id: TypeId) -> Option<Arc<SchemaGraph>> {
        self.schemas.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of cached graphs.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Drop every cached graph. Graphs already handed out stay valid.
    pub fn clear(&self) {
        self.schemas.clear();
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Total number of graphs built by this cache.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}
