//! Shared schema slot.
//!
//! The host owns the assembled schema after bootstrap and shares it
//! read-only with the serving layer and any embedder for the lifetime of
//! the process. Reads are lock-free.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::factory::AssembledSchema;

/// Holds the assembled schema once bootstrap has produced it.
#[derive(Default)]
pub struct SchemaHost {
    slot: ArcSwapOption<AssembledSchema>,
}

impl SchemaHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes the assembled schema. Intended to be called once per
    /// bootstrap; a re-triggered bootstrap replaces the previous schema.
    pub fn publish(&self, schema: Arc<AssembledSchema>) {
        self.slot.store(Some(schema));
    }

    /// Returns the published schema, if bootstrap has completed.
    #[must_use]
    pub fn get(&self) -> Option<Arc<AssembledSchema>> {
        self.slot.load_full()
    }

    /// Whether a schema has been published.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.slot.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BuildSchemaOptions;
    use crate::factory::SchemaFactory;

    #[tokio::test]
    async fn test_publish_and_get() {
        let host = SchemaHost::new();
        assert!(host.get().is_none());
        assert!(!host.is_ready());

        let options = BuildSchemaOptions {
            skip_check: true,
            ..Default::default()
        };
        let schema = SchemaFactory::new()
            .create(&[], &[], &options)
            .await
            .unwrap();
        host.publish(Arc::new(schema));

        assert!(host.is_ready());
        assert!(host.get().is_some());
    }
}
