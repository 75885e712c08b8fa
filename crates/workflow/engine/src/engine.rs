//! Workflow Engine: the main entry point
//!
//! Composes the registry, the instance manager, and the transition
//! engine over one shared [`Storage`]. Built once at startup and handed
//! to whatever serves requests; clones share the same storage.

use crate::storage::{InMemoryStorage, Storage};
use crate::{DefinitionRegistry, InstanceManager, TransitionEngine};
use serde::Serialize;
use std::sync::Arc;
use workflow_types::*;

/// Counts reported by [`WorkflowEngine::stats`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub definitions: usize,
    pub instances: usize,
}

/// The workflow engine
#[derive(Clone, Debug)]
pub struct WorkflowEngine {
    definitions: DefinitionRegistry,
    instances: InstanceManager,
    transitions: TransitionEngine,
}

impl WorkflowEngine {
    /// Create an engine over the given storage
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            definitions: DefinitionRegistry::new(Arc::clone(&storage)),
            instances: InstanceManager::new(Arc::clone(&storage)),
            transitions: TransitionEngine::new(storage),
        }
    }

    /// Create an engine backed by a fresh [`InMemoryStorage`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()))
    }

    // ── Definitions ──────────────────────────────────────────────────

    /// Validate and register a workflow definition
    pub fn create_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> WorkflowResult<WorkflowDefinition> {
        self.definitions
            .register(definition)
            .map(|d| d.as_ref().clone())
    }

    /// Get a workflow definition
    pub fn get_definition(&self, id: &WorkflowDefinitionId) -> Option<WorkflowDefinition> {
        self.definitions.get(id).map(|d| d.as_ref().clone())
    }

    /// List all definitions
    pub fn list_definitions(&self) -> Vec<WorkflowDefinition> {
        self.definitions
            .list()
            .iter()
            .map(|d| d.as_ref().clone())
            .collect()
    }

    // ── Instances ────────────────────────────────────────────────────

    /// Start a new instance of a registered definition
    pub fn start_instance(
        &self,
        definition_id: &WorkflowDefinitionId,
    ) -> WorkflowResult<WorkflowInstance> {
        self.instances.start(definition_id)
    }

    /// Execute an action on a running instance
    pub fn execute_action(
        &self,
        instance_id: &WorkflowInstanceId,
        action_id: &ActionId,
    ) -> WorkflowResult<WorkflowInstance> {
        self.transitions.execute(instance_id, action_id)
    }

    /// Get a workflow instance
    pub fn get_instance(&self, id: &WorkflowInstanceId) -> Option<WorkflowInstance> {
        self.instances.get(id)
    }

    /// List all instances
    pub fn list_instances(&self) -> Vec<WorkflowInstance> {
        self.instances.list_all()
    }

    /// Actions an instance could execute right now
    pub fn available_actions(&self, instance_id: &WorkflowInstanceId) -> WorkflowResult<Vec<Action>> {
        let instance = self
            .instances
            .get(instance_id)
            .ok_or_else(|| WorkflowError::InstanceNotFound(instance_id.clone()))?;
        let definition = self.definitions.get(&instance.definition_id).ok_or_else(|| {
            WorkflowError::DanglingDefinition {
                instance: instance.id.clone(),
                definition: instance.definition_id.clone(),
            }
        })?;
        Ok(TransitionEngine::available_actions(&instance, &definition)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            definitions: self.definitions.count(),
            instances: self.instances.count(),
        }
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_definition() -> WorkflowDefinition {
        WorkflowDefinition::new("order", "Order")
            .with_state(State::initial("new"))
            .with_state(State::new("shipped"))
            .with_state(State::terminal("done"))
            .with_action(Action::new("ship", "shipped").from_state("new"))
            .with_action(Action::new("close", "done").from_state("shipped"))
    }

    #[test]
    fn test_full_lifecycle() {
        let engine = WorkflowEngine::in_memory();
        engine.create_definition(order_definition()).unwrap();

        let instance = engine
            .start_instance(&WorkflowDefinitionId::new("order"))
            .unwrap();
        assert_eq!(instance.current_state_id, StateId::new("new"));

        let instance = engine
            .execute_action(&instance.id, &ActionId::new("ship"))
            .unwrap();
        assert_eq!(instance.current_state_id, StateId::new("shipped"));
        assert_eq!(instance.history.len(), 2);

        let instance = engine
            .execute_action(&instance.id, &ActionId::new("close"))
            .unwrap();
        assert_eq!(instance.current_state_id, StateId::new("done"));
        assert_eq!(instance.history.len(), 3);

        assert!(engine
            .execute_action(&instance.id, &ActionId::new("ship"))
            .is_err());
        assert_eq!(engine.get_instance(&instance.id), Some(instance));
    }

    #[test]
    fn test_rejected_definition_not_listed() {
        let engine = WorkflowEngine::in_memory();
        let def = WorkflowDefinition::new("twin", "Twin")
            .with_state(State::initial("a"))
            .with_state(State::initial("b"));

        assert_eq!(
            engine.create_definition(def).unwrap_err(),
            WorkflowError::InitialStateCount { found: 2 }
        );
        assert!(engine.list_definitions().is_empty());
        assert!(engine
            .get_definition(&WorkflowDefinitionId::new("twin"))
            .is_none());
    }

    #[test]
    fn test_reads_are_idempotent() {
        let engine = WorkflowEngine::in_memory();
        engine.create_definition(order_definition()).unwrap();
        let instance = engine
            .start_instance(&WorkflowDefinitionId::new("order"))
            .unwrap();

        let id = WorkflowDefinitionId::new("order");
        assert_eq!(engine.get_definition(&id), engine.get_definition(&id));
        assert_eq!(
            engine.get_instance(&instance.id),
            engine.get_instance(&instance.id)
        );
    }

    #[test]
    fn test_available_actions() {
        let engine = WorkflowEngine::in_memory();
        engine.create_definition(order_definition()).unwrap();
        let instance = engine
            .start_instance(&WorkflowDefinitionId::new("order"))
            .unwrap();

        let actions = engine.available_actions(&instance.id).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, ActionId::new("ship"));
        assert!(engine
            .available_actions(&WorkflowInstanceId::new("missing"))
            .is_err());
    }

    #[test]
    fn test_clones_share_storage() {
        let engine = WorkflowEngine::in_memory();
        let other = engine.clone();
        engine.create_definition(order_definition()).unwrap();
        other
            .start_instance(&WorkflowDefinitionId::new("order"))
            .unwrap();

        assert_eq!(
            engine.stats(),
            EngineStats {
                definitions: 1,
                instances: 1
            }
        );
    }
}
