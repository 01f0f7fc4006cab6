// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Destination-cluster applier interface.
//!
//! The passive side ingests raw history through a single RPC,
//! [`HistoryApplier::replicate_raw_events`]. These are the *internal* wire
//! shapes of the platform: structurally identical to the source-cluster
//! shapes in [`crate::source`], but kept nominally distinct so a value's
//! origin is always visible in the types and the two APIs cannot be wired
//! across by accident.
//!
//! The applier is required to be idempotent on
//! `(domain_id, workflow_id, run_id, events)`: re-replication retries whole
//! spans and never rolls back partial progress.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Type alias for boxed apply futures (reduces trait signature complexity).
pub type ApplyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ApplyError>> + Send + 'a>>;

/// Simplified error for destination-applier operations.
#[derive(Debug, Clone)]
pub struct ApplyError(pub String);

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApplyError {}

/// Encoding tag of an internal history blob.
///
/// Only [`EncodingType::Bincode`] is recognized by this component; the JSON
/// tag exists on the wire but fails conversion and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingType {
    Bincode,
    Json,
}

/// A serialized batch of history events plus its encoding tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlob {
    pub encoding_type: EncodingType,
    pub data: Vec<u8>,
}

impl DataBlob {
    /// Create a blob carrying the recognized binary encoding.
    pub fn bincode(data: Vec<u8>) -> Self {
        Self {
            encoding_type: EncodingType::Bincode,
            data,
        }
    }
}

/// Per-cluster replication progress, forwarded opaquely with every apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationInfo {
    pub version: i64,
    pub last_event_id: i64,
}

/// Request to ingest one batch of raw history into the destination cluster.
///
/// Targets exactly one run. `new_run_history`, when set, carries the first
/// batch of the successor run and is only ever attached to the final request
/// of a run that ended in continue-as-new; the applier needs the pair
/// atomically to create the successor execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateRawEventsRequest {
    pub domain_id: String,
    pub workflow_id: String,
    pub run_id: String,
    pub replication_info: HashMap<String, ReplicationInfo>,
    pub history: DataBlob,
    pub new_run_history: Option<DataBlob>,
    pub event_store_version: i32,
    pub new_run_event_store_version: Option<i32>,
}

/// Destination-cluster history ingest RPC.
///
/// Implementations wrap the real history-service client; they must be safe
/// for concurrent use.
pub trait HistoryApplier: Send + Sync {
    /// Apply one batch of raw events. Must be idempotent.
    fn replicate_raw_events(&self, request: ReplicateRawEventsRequest) -> ApplyFuture<'_>;
}

/// A no-op applier for testing/standalone mode.
///
/// Logs what it would apply but doesn't ship anything.
#[derive(Clone)]
pub struct NoOpHistoryApplier;

impl HistoryApplier for NoOpHistoryApplier {
    fn replicate_raw_events(&self, request: ReplicateRawEventsRequest) -> ApplyFuture<'_> {
        Box::pin(async move {
            tracing::debug!(
                workflow_id = %request.workflow_id,
                run_id = %request.run_id,
                history_len = request.history.data.len(),
                has_new_run_history = request.new_run_history.is_some(),
                "NoOp: would replicate raw events"
            );
            Ok(())
        })
    }
}
