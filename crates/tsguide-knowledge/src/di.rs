//! Service registration for tsguide-knowledge

use std::sync::Arc;

use tracing::error;
use tsguide_common::di::{ServiceEntry, ServiceFactory};

use crate::KnowledgeBase;

inventory::submit! {
    ServiceFactory::with_priority("knowledge", create_knowledge_services, 10)
}

fn create_knowledge_services() -> Vec<ServiceEntry> {
    match KnowledgeBase::load_default() {
        Ok(kb) => vec![ServiceEntry::new::<KnowledgeBase>(Arc::new(kb))],
        Err(e) => {
            error!("Embedded catalog failed to load: {}", e);
            Vec::new()
        }
    }
}
