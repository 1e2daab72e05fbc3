use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::source::{
    Capability,
    SourceClient,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Source id must not be empty")]
    EmptyId,

    #[error("Duplicate source id: {0}")]
    DuplicateId(String),
}

/// Source registry - owns every source for the aggregator's lifetime.
///
/// Registration order is kept and used as the tie-break for sources that are
/// missing from a priority list.
pub struct SourceRegistry {
    sources: Vec<Arc<dyn SourceClient>>,
    index: HashMap<String, usize>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn register(&mut self, source: Arc<dyn SourceClient>) -> Result<(), RegistryError> {
        let id = source.id().trim().to_string();
        if id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }

        self.index.insert(id, self.sources.len());
        self.sources.push(source);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn SourceClient>> {
        self.index.get(id).map(|&idx| &self.sources[idx])
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registered ids in registration order
    pub fn source_ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.id().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SourceClient>> {
        self.sources.iter()
    }

    pub fn with_capability(&self, capability: Capability) -> Vec<Arc<dyn SourceClient>> {
        self.sources
            .iter()
            .filter(|s| s.capabilities().supports(capability))
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sources.len()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
