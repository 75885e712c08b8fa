//! Instance lifecycle: starting instances and reading them back

use crate::storage::{Storage, StorageError};
use std::sync::Arc;
use workflow_types::{
    WorkflowDefinitionId, WorkflowError, WorkflowInstance, WorkflowInstanceId, WorkflowResult,
};

/// Creates instances from registered definitions and exposes them for reads
#[derive(Clone)]
pub struct InstanceManager {
    storage: Arc<dyn Storage>,
}

impl InstanceManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Start a new instance on the definition's initial state.
    ///
    /// The instance gets a fresh UUID and a single `START` history entry.
    pub fn start(&self, definition_id: &WorkflowDefinitionId) -> WorkflowResult<WorkflowInstance> {
        let definition = self.storage.get_definition(definition_id).ok_or_else(|| {
            tracing::warn!(definition_id = %definition_id, "Cannot start instance of unknown definition");
            WorkflowError::DefinitionNotFound(definition_id.clone())
        })?;

        let instance = WorkflowInstance::start(&definition).map_err(|e| {
            // Registration should have rejected this definition
            tracing::error!(definition_id = %definition_id, error = %e, "Registered definition is inconsistent");
            e
        })?;

        self.storage
            .insert_instance(instance.clone())
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => {
                    WorkflowError::InstanceAlreadyExists(instance.id.clone())
                }
            })?;

        tracing::info!(
            instance_id = %instance.id,
            definition = %definition_id,
            state = %instance.current_state_id,
            "Workflow instance started"
        );

        Ok(instance)
    }

    /// Get a workflow instance
    pub fn get(&self, id: &WorkflowInstanceId) -> Option<WorkflowInstance> {
        self.storage.get_instance(id)
    }

    /// Snapshot of every instance; later transitions are not reflected
    pub fn list_all(&self) -> Vec<WorkflowInstance> {
        self.storage.list_instances()
    }

    /// Total number of instances
    pub fn count(&self) -> usize {
        self.storage.instance_count()
    }
}

impl std::fmt::Debug for InstanceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceManager")
            .field("instances", &self.count())
            .finish()
    }
}
