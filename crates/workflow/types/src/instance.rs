//! Workflow instances: running executions of workflow definitions
//!
//! A WorkflowInstance is a single token on its definition's state
//! machine. It tracks the current state and an append-only history of
//! every transition, starting with a synthetic `START` entry.

use crate::{ActionId, StateId, WorkflowDefinition, WorkflowDefinitionId, WorkflowError, WorkflowResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ── Instance Identifier ──────────────────────────────────────────────

/// Unique identifier for a workflow instance
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct WorkflowInstanceId(pub String);

impl WorkflowInstanceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkflowInstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WorkflowInstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WorkflowInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── History ──────────────────────────────────────────────────────────

/// One traversed edge in an instance's history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The executed action, or `START` for the first entry
    pub action_id: ActionId,
    pub timestamp: DateTime<Utc>,
    /// `None` only on the `START` entry
    pub from_state_id: Option<StateId>,
    pub to_state_id: StateId,
}

impl HistoryEntry {
    pub fn is_start(&self) -> bool {
        self.from_state_id.is_none()
    }
}

// ── Workflow Instance ────────────────────────────────────────────────

/// A running instance of a workflow definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: WorkflowInstanceId,
    /// Lookup key of the definition this instance follows
    #[serde(alias = "workflowDefinitionId")]
    pub definition_id: WorkflowDefinitionId,
    pub current_state_id: StateId,
    pub history: Vec<HistoryEntry>,
}

impl WorkflowInstance {
    /// Create a fresh instance positioned on the definition's initial state
    pub fn start(definition: &WorkflowDefinition) -> WorkflowResult<Self> {
        let initial = definition
            .initial_state()
            .ok_or_else(|| WorkflowError::NoInitialState(definition.id.clone()))?;

        Ok(Self {
            id: WorkflowInstanceId::generate(),
            definition_id: definition.id.clone(),
            current_state_id: initial.id.clone(),
            history: vec![HistoryEntry {
                action_id: ActionId::start(),
                timestamp: Utc::now(),
                from_state_id: None,
                to_state_id: initial.id.clone(),
            }],
        })
    }

    /// Move to `to_state` and append the matching history entry.
    ///
    /// Rule checks belong to the caller; this only applies the effect.
    pub fn record_transition(&mut self, action_id: ActionId, to_state: StateId) {
        let timestamp = self.next_timestamp();
        let from = std::mem::replace(&mut self.current_state_id, to_state.clone());
        self.history.push(HistoryEntry {
            action_id,
            timestamp,
            from_state_id: Some(from),
            to_state_id: to_state,
        });
    }

    /// Most recent history entry
    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// Number of executed actions, not counting `START`
    pub fn transition_count(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Check the history invariants: non-empty, starts with the only
    /// `START` entry, strictly increasing timestamps, chained states, and
    /// a current state equal to the last target.
    pub fn history_is_consistent(&self) -> bool {
        let Some(first) = self.history.first() else {
            return false;
        };
        if !first.is_start() {
            return false;
        }
        let chained = self.history.windows(2).all(|pair| match pair {
            [prev, next] => {
                next.from_state_id.as_ref() == Some(&prev.to_state_id)
                    && next.timestamp > prev.timestamp
            }
            _ => true,
        });
        chained
            && self
                .last_entry()
                .is_some_and(|last| last.to_state_id == self.current_state_id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Now, or one nanosecond after the previous entry if the clock has
    /// not moved past it
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.last_entry() {
            Some(last) if now <= last.timestamp => last.timestamp + Duration::nanoseconds(1),
            _ => now,
        }
    }
}
