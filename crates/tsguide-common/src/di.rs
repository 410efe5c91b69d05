//! Service registration types for auto-discovery
//!
//! Each crate submits a [`ServiceFactory`] with `inventory::submit!`. The
//! factory builds that crate's shared services and hands them back as
//! type-erased [`ServiceEntry`] items; [`create_services`] runs every
//! discovered factory in priority order and indexes the results by type.
//!
//! ```rust,ignore
//! use tsguide_common::di::{ServiceEntry, ServiceFactory};
//! use std::sync::Arc;
//!
//! inventory::submit! {
//!     ServiceFactory::new("knowledge", create_knowledge_services)
//! }
//!
//! fn create_knowledge_services() -> Vec<ServiceEntry> {
//!     vec![ServiceEntry::new::<KnowledgeBase>(Arc::new(KnowledgeBase::load_default()?))]
//! }
//! ```

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use tracing::{debug, info, warn};

/// Errors raised while resolving registered services
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// No factory produced a service of the requested type
    #[error("Service not registered: {type_name}")]
    NotRegistered {
        /// Name of the requested type
        type_name: &'static str,
    },
}

/// A type-erased service instance produced by a factory
pub struct ServiceEntry {
    /// Registration key
    pub type_id: TypeId,
    /// Human-readable type name for diagnostics
    pub type_name: &'static str,
    /// The shared service instance
    pub instance: Arc<dyn Any + Send + Sync>,
}

impl ServiceEntry {
    /// Create a service entry for a concrete type
    pub fn new<T: Send + Sync + 'static>(instance: Arc<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instance: instance as Arc<dyn Any + Send + Sync>,
        }
    }
}

impl std::fmt::Debug for ServiceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// A named factory that creates the services of one crate
pub struct ServiceFactory {
    /// Name of the service group (e.g. "knowledge", "engine")
    pub name: &'static str,
    /// Builds the group's services
    pub factory_fn: fn() -> Vec<ServiceEntry>,
    /// Registration order, lower runs first (default 100)
    pub priority: u32,
}

impl ServiceFactory {
    /// Create a factory with default priority
    pub const fn new(name: &'static str, factory_fn: fn() -> Vec<ServiceEntry>) -> Self {
        Self {
            name,
            factory_fn,
            priority: 100,
        }
    }

    /// Create a factory with a custom priority
    pub const fn with_priority(
        name: &'static str,
        factory_fn: fn() -> Vec<ServiceEntry>,
        priority: u32,
    ) -> Self {
        Self {
            name,
            factory_fn,
            priority,
        }
    }
}

inventory::collect!(ServiceFactory);

/// Services created by all discovered factories, keyed by type
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, ServiceEntry>,
}

impl ServiceRegistry {
    /// Register an entry; a later entry for the same type replaces the earlier one
    pub fn insert(&mut self, entry: ServiceEntry) {
        if let Some(previous) = self.services.insert(entry.type_id, entry) {
            warn!("Service {} registered twice, keeping the latest", previous.type_name);
        }
    }

    /// Resolve a service by type
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.instance.clone().downcast::<T>().ok())
    }

    /// Resolve a service by type, failing when nothing registered it
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistrationError> {
        self.get::<T>().ok_or(RegistrationError::NotRegistered {
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no services are registered
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Run every discovered factory in priority order and collect its services.
pub fn create_services() -> ServiceRegistry {
    let mut factories: Vec<&ServiceFactory> = inventory::iter::<ServiceFactory>().collect();
    factories.sort_by_key(|f| (f.priority, f.name));

    info!("Discovered {} service factories", factories.len());

    let mut registry = ServiceRegistry::default();
    for factory in factories {
        let services = (factory.factory_fn)();
        debug!(
            "Factory '{}' (priority {}) created {} services",
            factory.name,
            factory.priority,
            services.len()
        );
        for service in services {
            registry.insert(service);
        }
    }

    registry
}

/// Count of discovered service factories
pub fn discovered_factory_count() -> usize {
    inventory::iter::<ServiceFactory>().count()
}

/// Names of all discovered service factories
pub fn list_discovered_factories() -> Vec<&'static str> {
    inventory::iter::<ServiceFactory>().map(|f| f.name).collect()
}
