//! Workflow history event model.
//!
//! Every run of a workflow has its own history: an ordered sequence of
//! events with strictly increasing IDs starting at [`FIRST_EVENT_ID`].
//! The traversal only ever inspects two event types:
//!
//! - [`EventType::WorkflowExecutionStarted`] — always event 1 of a run; may
//!   name the run it continued from.
//! - [`EventType::WorkflowExecutionContinuedAsNew`] — always the last event
//!   of a run that rolled over into a fresh run; names the successor run.
//!
//! Every other type is carried through as opaque payload.

use serde::{Deserialize, Serialize};

/// First event ID of every run.
pub const FIRST_EVENT_ID: i64 = 1;

/// Sentinel event ID meaning "up to and including the last event of the
/// run". Used as the exclusive upper bound of fetch ranges.
pub const END_EVENT_ID: i64 = i64::MAX;

/// Workflow history event types.
///
/// Only the workflow-lifecycle bookends matter to re-replication; the task
/// and timer types exist so that real history batches deserialize without
/// loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    WorkflowExecutionStarted,
    WorkflowExecutionCompleted,
    WorkflowExecutionFailed,
    WorkflowExecutionTimedOut,
    WorkflowExecutionCanceled,
    WorkflowExecutionTerminated,
    WorkflowExecutionContinuedAsNew,
    DecisionTaskScheduled,
    DecisionTaskStarted,
    DecisionTaskCompleted,
    DecisionTaskTimedOut,
    ActivityTaskScheduled,
    ActivityTaskStarted,
    ActivityTaskCompleted,
    ActivityTaskFailed,
    TimerStarted,
    TimerFired,
    TimerCanceled,
    SignalExternalWorkflowExecutionInitiated,
    WorkflowExecutionSignaled,
    MarkerRecorded,
}

/// Attributes of a `WorkflowExecutionStarted` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowExecutionStartedAttributes {
    /// Run this execution continued from, when the workflow rolled over via
    /// continue-as-new. Unset for a chain's head run.
    pub continued_execution_run_id: Option<String>,
}

/// Attributes of a `WorkflowExecutionContinuedAsNew` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowExecutionContinuedAsNewAttributes {
    /// Run the workflow continued into. Always set.
    pub new_execution_run_id: String,
}

/// One history event within a run.
///
/// `event_id` is strictly increasing within a run; `version` is the
/// failover version stamped by the emitting cluster; `timestamp` is unix
/// nanoseconds. Attribute payloads are present only for the event types the
/// traversal reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub event_id: i64,
    pub version: i64,
    pub timestamp: i64,
    pub event_type: EventType,
    pub started_attributes: Option<WorkflowExecutionStartedAttributes>,
    pub continued_as_new_attributes: Option<WorkflowExecutionContinuedAsNewAttributes>,
}

impl HistoryEvent {
    /// Create an event with no attribute payload.
    pub fn new(event_id: i64, version: i64, timestamp: i64, event_type: EventType) -> Self {
        Self {
            event_id,
            version,
            timestamp,
            event_type,
            started_attributes: None,
            continued_as_new_attributes: None,
        }
    }

    /// Create a `WorkflowExecutionStarted` event.
    pub fn started(
        event_id: i64,
        version: i64,
        timestamp: i64,
        continued_execution_run_id: Option<String>,
    ) -> Self {
        Self {
            event_id,
            version,
            timestamp,
            event_type: EventType::WorkflowExecutionStarted,
            started_attributes: Some(WorkflowExecutionStartedAttributes {
                continued_execution_run_id,
            }),
            continued_as_new_attributes: None,
        }
    }

    /// Create a `WorkflowExecutionContinuedAsNew` event.
    pub fn continued_as_new(
        event_id: i64,
        version: i64,
        timestamp: i64,
        new_execution_run_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id,
            version,
            timestamp,
            event_type: EventType::WorkflowExecutionContinuedAsNew,
            started_attributes: None,
            continued_as_new_attributes: Some(WorkflowExecutionContinuedAsNewAttributes {
                new_execution_run_id: new_execution_run_id.into(),
            }),
        }
    }

    /// Run this execution continued from, if this is a started event that
    /// carries the back-link.
    pub fn continued_from_run_id(&self) -> Option<&str> {
        self.started_attributes
            .as_ref()
            .and_then(|attributes| attributes.continued_execution_run_id.as_deref())
    }

    /// Successor run, if this is a continued-as-new event.
    pub fn new_execution_run_id(&self) -> Option<&str> {
        self.continued_as_new_attributes
            .as_ref()
            .map(|attributes| attributes.new_execution_run_id.as_str())
    }
}
