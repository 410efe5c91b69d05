//! Service registration for tsguide-engine

use std::sync::Arc;

use tracing::error;
use tsguide_common::di::{ServiceEntry, ServiceFactory};

use crate::{config::EngineConfig, GuidanceEngine};

inventory::submit! {
    ServiceFactory::with_priority("engine", create_engine_services, 20)
}

fn create_engine_services() -> Vec<ServiceEntry> {
    match GuidanceEngine::from_config(&EngineConfig::default()) {
        Ok(engine) => vec![ServiceEntry::new::<GuidanceEngine>(Arc::new(engine))],
        Err(e) => {
            error!("Default guidance engine failed to start: {}", e);
            Vec::new()
        }
    }
}
