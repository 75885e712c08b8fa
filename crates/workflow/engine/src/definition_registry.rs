//! Definition registry: validates, stores, and retrieves workflow definitions
//!
//! Workflow definitions are immutable once registered. There is no
//! update, delete, or versioning.

use crate::storage::{Storage, StorageError};
use std::sync::Arc;
use workflow_types::{WorkflowDefinition, WorkflowDefinitionId, WorkflowError, WorkflowResult};

/// Registry of workflow definitions
#[derive(Clone)]
pub struct DefinitionRegistry {
    storage: Arc<dyn Storage>,
}

impl DefinitionRegistry {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Register a workflow definition
    ///
    /// Rules are checked in a fixed order and the first violation is
    /// reported: blank id, id already taken, initial-state count,
    /// duplicate state ids, duplicate action ids, dangling action
    /// references. Nothing is stored on failure.
    pub fn register(
        &self,
        definition: WorkflowDefinition,
    ) -> WorkflowResult<Arc<WorkflowDefinition>> {
        let id = definition.id.clone();
        let result = self.check(&definition).and_then(|()| {
            self.storage
                .insert_definition(definition)
                .map_err(|e| match e {
                    // Lost a race against a concurrent registration of the same id
                    StorageError::AlreadyExists(_) => {
                        WorkflowError::DefinitionAlreadyExists(id.clone())
                    }
                })
        });

        match &result {
            Ok(stored) => tracing::info!(
                definition_id = %stored.id,
                states = stored.state_count(),
                actions = stored.action_count(),
                "Workflow definition registered"
            ),
            Err(e) => tracing::warn!(
                definition_id = %id,
                error = %e,
                "Workflow definition rejected"
            ),
        }

        result
    }

    /// Validate a definition against the registry without storing it
    pub fn check(&self, definition: &WorkflowDefinition) -> WorkflowResult<()> {
        definition.validate_id()?;
        if self.storage.contains_definition(&definition.id) {
            return Err(WorkflowError::DefinitionAlreadyExists(definition.id.clone()));
        }
        definition.validate_states_and_actions()
    }

    /// Get a definition by ID
    pub fn get(&self, id: &WorkflowDefinitionId) -> Option<Arc<WorkflowDefinition>> {
        self.storage.get_definition(id)
    }

    /// List all registered definitions
    pub fn list(&self) -> Vec<Arc<WorkflowDefinition>> {
        self.storage.list_definitions()
    }

    /// Total number of registered definitions
    pub fn count(&self) -> usize {
        self.storage.definition_count()
    }
}

impl std::fmt::Debug for DefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionRegistry")
            .field("definitions", &self.count())
            .finish()
    }
}
