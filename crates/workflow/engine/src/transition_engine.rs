//! Transition engine: decides whether an action may fire and applies it
//!
//! Rule checks, first failure wins:
//! 1. the instance exists
//! 2. its definition exists
//! 3. the definition declares the action
//! 4. the action is enabled
//! 5. the current state is one of the action's source states
//! 6. the current state is not final
//!
//! A current state that cannot be found in the definition does not block
//! rule 6. `State::enabled` is never consulted.

use crate::storage::Storage;
use std::sync::Arc;
use workflow_types::*;

/// Applies actions to workflow instances
#[derive(Clone)]
pub struct TransitionEngine {
    storage: Arc<dyn Storage>,
}

impl TransitionEngine {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Execute `action_id` on the instance.
    ///
    /// Checks and the state change happen while the instance is
    /// exclusively held, so readers see either the old state and history
    /// or both updated together.
    pub fn execute(
        &self,
        instance_id: &WorkflowInstanceId,
        action_id: &ActionId,
    ) -> WorkflowResult<WorkflowInstance> {
        let result = self.storage.update_instance(instance_id, &mut |instance| {
            let definition = self
                .storage
                .get_definition(&instance.definition_id)
                .ok_or_else(|| WorkflowError::DanglingDefinition {
                    instance: instance.id.clone(),
                    definition: instance.definition_id.clone(),
                })?;

            let target = Self::check(instance, &definition, action_id)?.to_state.clone();
            instance.record_transition(action_id.clone(), target);
            Ok(())
        });

        match &result {
            Ok(instance) => tracing::info!(
                instance_id = %instance_id,
                action = %action_id,
                state = %instance.current_state_id,
                "Action executed"
            ),
            Err(e @ WorkflowError::DanglingDefinition { .. }) => tracing::error!(
                instance_id = %instance_id,
                action = %action_id,
                error = %e,
                "Instance references a missing definition"
            ),
            Err(e) => tracing::warn!(
                instance_id = %instance_id,
                action = %action_id,
                error = %e,
                "Action rejected"
            ),
        }

        result
    }

    /// Rules 3 to 6 for one instance against its definition.
    ///
    /// Returns the action that would fire.
    pub fn check<'d>(
        instance: &WorkflowInstance,
        definition: &'d WorkflowDefinition,
        action_id: &ActionId,
    ) -> WorkflowResult<&'d Action> {
        let action = definition.get_action(action_id).ok_or_else(|| {
            WorkflowError::ActionNotInDefinition {
                action: action_id.clone(),
                definition: definition.id.clone(),
            }
        })?;

        if !action.enabled {
            return Err(WorkflowError::ActionDisabled(action_id.clone()));
        }

        let current = &instance.current_state_id;
        if !action.accepts_from(current) {
            return Err(WorkflowError::InvalidSourceState {
                state: current.clone(),
                action: action_id.clone(),
            });
        }

        if definition.get_state(current).is_some_and(|s| s.is_final) {
            return Err(WorkflowError::FinalState {
                action: action_id.clone(),
                state: current.clone(),
            });
        }

        Ok(action)
    }

    /// Actions that would currently pass every rule for this instance
    pub fn available_actions<'d>(
        instance: &WorkflowInstance,
        definition: &'d WorkflowDefinition,
    ) -> Vec<&'d Action> {
        definition
            .actions
            .iter()
            .filter(|a| Self::check(instance, definition, &a.id).is_ok())
            .collect()
    }
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DefinitionStore, InMemoryStorage, InstanceStore};

    fn make_definition() -> WorkflowDefinition {
        WorkflowDefinition::new("order", "Order")
            .with_state(State::initial("new"))
            .with_state(State::new("shipped"))
            .with_state(State::terminal("done"))
            .with_action(Action::new("ship", "shipped").from_state("new"))
            .with_action(Action::new("close", "done").from_state("shipped"))
            .with_action(Action::new("hold", "new").from_state("new").disabled())
            .with_action(
                Action::new("reopen", "new")
                    .from_state("shipped")
                    .from_state("done"),
            )
    }

    fn setup() -> (Arc<InMemoryStorage>, TransitionEngine, WorkflowInstanceId) {
        let storage = Arc::new(InMemoryStorage::new());
        let def = make_definition();
        let instance = WorkflowInstance::start(&def).unwrap();
        let id = instance.id.clone();
        storage.insert_definition(def).unwrap();
        storage.insert_instance(instance).unwrap();
        let engine = TransitionEngine::new(storage.clone());
        (storage, engine, id)
    }

    #[test]
    fn test_execute_moves_state_and_appends_history() {
        let (_, engine, id) = setup();

        let updated = engine.execute(&id, &ActionId::new("ship")).unwrap();
        assert_eq!(updated.current_state_id, StateId::new("shipped"));
        assert_eq!(updated.history.len(), 2);

        let entry = updated.last_entry().unwrap();
        assert_eq!(entry.action_id, ActionId::new("ship"));
        assert_eq!(entry.from_state_id, Some(StateId::new("new")));
        assert_eq!(entry.to_state_id, StateId::new("shipped"));
        assert!(updated.history_is_consistent());
    }

    #[test]
    fn test_unknown_instance() {
        let (_, engine, _) = setup();
        let missing = WorkflowInstanceId::new("missing");
        assert_eq!(
            engine.execute(&missing, &ActionId::new("ship")),
            Err(WorkflowError::InstanceNotFound(missing))
        );
    }

    #[test]
    fn test_dangling_definition() {
        let storage = Arc::new(InMemoryStorage::new());
        let instance = WorkflowInstance::start(&make_definition()).unwrap();
        let id = instance.id.clone();
        // Definition was never stored
        storage.insert_instance(instance).unwrap();
        let engine = TransitionEngine::new(storage.clone());

        let err = engine.execute(&id, &ActionId::new("ship")).unwrap_err();
        assert!(matches!(err, WorkflowError::DanglingDefinition { .. }));
        assert_eq!(err.kind(), ErrorKind::InternalConsistency);
    }

    #[test]
    fn test_action_not_in_definition() {
        let (_, engine, id) = setup();
        assert_eq!(
            engine.execute(&id, &ActionId::new("teleport")),
            Err(WorkflowError::ActionNotInDefinition {
                action: ActionId::new("teleport"),
                definition: WorkflowDefinitionId::new("order"),
            })
        );
    }

    #[test]
    fn test_disabled_action() {
        let (_, engine, id) = setup();
        assert_eq!(
            engine.execute(&id, &ActionId::new("hold")),
            Err(WorkflowError::ActionDisabled(ActionId::new("hold")))
        );
    }

    #[test]
    fn test_wrong_source_state_leaves_instance_unchanged() {
        let (storage, engine, id) = setup();
        let before = storage.get_instance(&id).unwrap();

        assert_eq!(
            engine.execute(&id, &ActionId::new("close")),
            Err(WorkflowError::InvalidSourceState {
                state: StateId::new("new"),
                action: ActionId::new("close"),
            })
        );
        assert_eq!(storage.get_instance(&id).unwrap(), before);
    }

    #[test]
    fn test_final_state_blocks_even_listed_sources() {
        let (_, engine, id) = setup();
        engine.execute(&id, &ActionId::new("ship")).unwrap();
        engine.execute(&id, &ActionId::new("close")).unwrap();

        // "reopen" lists "done" as a source, but "done" is final
        assert_eq!(
            engine.execute(&id, &ActionId::new("reopen")),
            Err(WorkflowError::FinalState {
                action: ActionId::new("reopen"),
                state: StateId::new("done"),
            })
        );
    }

    #[test]
    fn test_source_check_precedes_final_check() {
        let (_, engine, id) = setup();
        engine.execute(&id, &ActionId::new("ship")).unwrap();
        engine.execute(&id, &ActionId::new("close")).unwrap();

        assert!(matches!(
            engine.execute(&id, &ActionId::new("ship")),
            Err(WorkflowError::InvalidSourceState { .. })
        ));
    }

    #[test]
    fn test_unknown_current_state_is_permitted() {
        let mut def = make_definition();
        def.actions.push(Action::new("recover", "new").from_state("limbo"));
        let mut instance = WorkflowInstance::start(&def).unwrap();
        instance.current_state_id = StateId::new("limbo");

        let action = TransitionEngine::check(&instance, &def, &ActionId::new("recover")).unwrap();
        assert_eq!(action.to_state, StateId::new("new"));
    }

    #[test]
    fn test_disabled_state_is_not_enforced() {
        let mut def = make_definition();
        for state in &mut def.states {
            state.enabled = false;
        }
        let instance = WorkflowInstance::start(&def).unwrap();
        assert!(TransitionEngine::check(&instance, &def, &ActionId::new("ship")).is_ok());
    }

    #[test]
    fn test_available_actions() {
        let def = make_definition();
        let instance = WorkflowInstance::start(&def).unwrap();
        let ids: Vec<_> = TransitionEngine::available_actions(&instance, &def)
            .iter()
            .map(|a| a.id.to_string())
            .collect();
        assert_eq!(ids, vec!["ship"]);
    }
}
