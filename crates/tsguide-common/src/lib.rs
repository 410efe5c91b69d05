//! Shared plumbing for tsguide crates
//!
//! - [`di`]: factory-return service registration collected with `inventory`
//! - [`logging`]: one-shot `tracing` subscriber initialization

#![forbid(unsafe_code)]

pub mod di;
pub mod logging;

pub use di::{
    create_services, discovered_factory_count, list_discovered_factories, ServiceEntry,
    ServiceFactory, ServiceRegistry,
};
pub use logging::init_tracing;
