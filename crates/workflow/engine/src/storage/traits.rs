//! Storage trait definitions

use std::sync::Arc;
use workflow_types::{
    WorkflowDefinition, WorkflowDefinitionId, WorkflowInstance, WorkflowInstanceId, WorkflowResult,
};

/// Storage-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Insert refused because the key is taken
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Combined storage trait
pub trait Storage: DefinitionStore + InstanceStore + Send + Sync {}

/// Storage for workflow definitions.
///
/// Definitions are write-once: there is no update or delete.
pub trait DefinitionStore: Send + Sync {
    /// Insert a definition unless its ID is already present
    fn insert_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> StorageResult<Arc<WorkflowDefinition>>;

    /// Get a definition by ID
    fn get_definition(&self, id: &WorkflowDefinitionId) -> Option<Arc<WorkflowDefinition>>;

    /// Check if a definition exists
    fn contains_definition(&self, id: &WorkflowDefinitionId) -> bool;

    /// List all definitions, in no particular order
    fn list_definitions(&self) -> Vec<Arc<WorkflowDefinition>>;

    /// Total number of stored definitions
    fn definition_count(&self) -> usize;
}

/// Storage for workflow instances
pub trait InstanceStore: Send + Sync {
    /// Insert an instance unless its ID is already present
    fn insert_instance(&self, instance: WorkflowInstance) -> StorageResult<()>;

    /// Get a copy of an instance by ID
    fn get_instance(&self, id: &WorkflowInstanceId) -> Option<WorkflowInstance>;

    /// Copies of all instances, in no particular order
    fn list_instances(&self) -> Vec<WorkflowInstance>;

    /// Run `apply` against the stored instance while holding exclusive
    /// access to it, and return a copy of the result.
    ///
    /// `apply` must leave the instance untouched when it returns an error.
    /// A missing instance yields `WorkflowError::InstanceNotFound`.
    fn update_instance(
        &self,
        id: &WorkflowInstanceId,
        apply: &mut dyn FnMut(&mut WorkflowInstance) -> WorkflowResult<()>,
    ) -> WorkflowResult<WorkflowInstance>;

    /// Total number of stored instances
    fn instance_count(&self) -> usize;
}
