//! In-memory storage implementation
//!
//! Backed by sharded concurrent maps. Contents are lost on restart.

use super::traits::*;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use workflow_types::{
    WorkflowDefinition, WorkflowDefinitionId, WorkflowError, WorkflowInstance, WorkflowInstanceId,
    WorkflowResult,
};

/// In-memory storage for definitions and instances
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    definitions: DashMap<WorkflowDefinitionId, Arc<WorkflowDefinition>>,
    instances: DashMap<WorkflowInstanceId, WorkflowInstance>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            definitions: DashMap::new(),
            instances: DashMap::new(),
        }
    }
}

impl Storage for InMemoryStorage {}

impl DefinitionStore for InMemoryStorage {
    fn insert_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> StorageResult<Arc<WorkflowDefinition>> {
        match self.definitions.entry(definition.id.clone()) {
            Entry::Occupied(entry) => Err(StorageError::AlreadyExists(entry.key().to_string())),
            Entry::Vacant(entry) => {
                let definition = Arc::new(definition);
                entry.insert(Arc::clone(&definition));
                Ok(definition)
            }
        }
    }

    fn get_definition(&self, id: &WorkflowDefinitionId) -> Option<Arc<WorkflowDefinition>> {
        self.definitions.get(id).map(|d| Arc::clone(d.value()))
    }

    fn contains_definition(&self, id: &WorkflowDefinitionId) -> bool {
        self.definitions.contains_key(id)
    }

    fn list_definitions(&self) -> Vec<Arc<WorkflowDefinition>> {
        self.definitions
            .iter()
            .map(|d| Arc::clone(d.value()))
            .collect()
    }

    fn definition_count(&self) -> usize {
        self.definitions.len()
    }
}

impl InstanceStore for InMemoryStorage {
    fn insert_instance(&self, instance: WorkflowInstance) -> StorageResult<()> {
        match self.instances.entry(instance.id.clone()) {
            Entry::Occupied(entry) => Err(StorageError::AlreadyExists(entry.key().to_string())),
            Entry::Vacant(entry) => {
                entry.insert(instance);
                Ok(())
            }
        }
    }

    fn get_instance(&self, id: &WorkflowInstanceId) -> Option<WorkflowInstance> {
        self.instances.get(id).map(|i| i.value().clone())
    }

    fn list_instances(&self) -> Vec<WorkflowInstance> {
        self.instances.iter().map(|i| i.value().clone()).collect()
    }

    fn update_instance(
        &self,
        id: &WorkflowInstanceId,
        apply: &mut dyn FnMut(&mut WorkflowInstance) -> WorkflowResult<()>,
    ) -> WorkflowResult<WorkflowInstance> {
        // The shard stays write-locked until `instance` is dropped
        let mut instance = self
            .instances
            .get_mut(id)
            .ok_or_else(|| WorkflowError::InstanceNotFound(id.clone()))?;
        apply(instance.value_mut())?;
        Ok(instance.value().clone())
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_types::State;

    fn make_definition(id: &str) -> WorkflowDefinition {
        WorkflowDefinition::new(id, "Test").with_state(State::initial("start"))
    }

    #[test]
    fn test_insert_and_get_definition() {
        let storage = InMemoryStorage::new();
        storage.insert_definition(make_definition("a")).unwrap();

        let id = WorkflowDefinitionId::new("a");
        assert!(storage.contains_definition(&id));
        assert_eq!(storage.get_definition(&id).unwrap().name, "Test");
        assert!(storage
            .get_definition(&WorkflowDefinitionId::new("missing"))
            .is_none());
        assert_eq!(storage.definition_count(), 1);
    }

    #[test]
    fn test_insert_definition_twice_fails() {
        let storage = InMemoryStorage::new();
        storage.insert_definition(make_definition("a")).unwrap();

        let mut replacement = make_definition("a");
        replacement.name = "Replacement".into();
        let result = storage.insert_definition(replacement);

        assert_eq!(result.unwrap_err(), StorageError::AlreadyExists("a".into()));
        assert_eq!(
            storage
                .get_definition(&WorkflowDefinitionId::new("a"))
                .unwrap()
                .name,
            "Test"
        );
    }

    #[test]
    fn test_list_definitions() {
        let storage = InMemoryStorage::new();
        storage.insert_definition(make_definition("a")).unwrap();
        storage.insert_definition(make_definition("b")).unwrap();

        let mut ids: Vec<_> = storage
            .list_definitions()
            .iter()
            .map(|d| d.id.to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_instance_roundtrip() {
        let storage = InMemoryStorage::new();
        let instance = WorkflowInstance::start(&make_definition("a")).unwrap();
        let id = instance.id.clone();

        storage.insert_instance(instance.clone()).unwrap();
        assert_eq!(storage.get_instance(&id), Some(instance.clone()));
        assert_eq!(storage.list_instances().len(), 1);
        assert!(storage.insert_instance(instance).is_err());
        assert_eq!(storage.instance_count(), 1);
    }

    #[test]
    fn test_update_instance() {
        let storage = InMemoryStorage::new();
        let instance = WorkflowInstance::start(&make_definition("a")).unwrap();
        let id = instance.id.clone();
        storage.insert_instance(instance).unwrap();

        let updated = storage
            .update_instance(&id, &mut |i| {
                i.record_transition("loop".into(), "start".into());
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.history.len(), 2);
        assert_eq!(storage.get_instance(&id).unwrap().history.len(), 2);
    }

    #[test]
    fn test_update_instance_rejected_or_missing() {
        let storage = InMemoryStorage::new();
        let instance = WorkflowInstance::start(&make_definition("a")).unwrap();
        let id = instance.id.clone();
        storage.insert_instance(instance.clone()).unwrap();

        let result = storage.update_instance(&id, &mut |_| {
            Err(WorkflowError::NoInitialState(WorkflowDefinitionId::new("a")))
        });
        assert!(result.is_err());
        assert_eq!(storage.get_instance(&id), Some(instance));

        let missing = WorkflowInstanceId::new("missing");
        assert_eq!(
            storage.update_instance(&missing, &mut |_| Ok(())),
            Err(WorkflowError::InstanceNotFound(missing))
        );
    }
}
