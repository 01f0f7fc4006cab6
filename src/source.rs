// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Source-cluster raw-history interface.
//!
//! The active side exposes workflow history as opaque serialized batches
//! through a paginated RPC, [`SourceHistoryClient`]. These are the *public*
//! wire shapes of the platform's outward-facing API; see [`crate::apply`]
//! for why they are kept nominally distinct from the internal shapes, and
//! [`crate::convert`] for the explicit crossings.
//!
//! # Pagination Contract
//!
//! - Requests carry the half-open event range `[first_event_id,
//!   next_event_id)`; [`crate::event::END_EVENT_ID`] means no upper bound.
//! - An empty or absent `next_page_token` on a response signals
//!   end-of-stream.
//! - The `branch_token` returned on the first page identifies the history
//!   branch being paginated and must be echoed on subsequent page requests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Type alias for boxed fetch futures.
pub type SourceFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// Simplified error for source-cluster operations.
#[derive(Debug, Clone)]
pub struct FetchError(pub String);

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FetchError {}

/// Encoding tag of a public history blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingType {
    Bincode,
    Json,
}

/// A serialized batch of history events as returned by the source cluster.
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

/// Per-cluster replication progress as exposed by the source cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationInfo {
    pub version: i64,
    pub last_event_id: i64,
}

/// Request for one page of raw history.
///
/// The source RPC is keyed on domain *name*, not ID; [`crate::fetch`] does
/// the resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRawHistoryRequest {
    pub domain: String,
    pub workflow_id: String,
    pub run_id: String,
    pub branch_token: Option<Vec<u8>>,
    pub first_event_id: i64,
    pub next_event_id: i64,
    pub maximum_page_size: i32,
    pub next_page_token: Option<Vec<u8>>,
}

/// One page of raw history.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRawHistoryResponse {
    /// Echo this on the next page request for the same run.
    pub branch_token: Option<Vec<u8>>,
    /// Zero or more serialized event batches, in event order.
    pub history_batches: Vec<DataBlob>,
    /// Absent or empty when this is the last page.
    pub next_page_token: Option<Vec<u8>>,
    pub replication_info: HashMap<String, ReplicationInfo>,
    pub event_store_version: i32,
}

impl GetRawHistoryResponse {
    /// Check whether another page follows this one.
    pub fn has_more_pages(&self) -> bool {
        self.next_page_token
            .as_ref()
            .is_some_and(|token| !token.is_empty())
    }
}

/// Source-cluster raw-history RPC.
///
/// Implementations wrap the real remote-cluster client; they must be safe
/// for concurrent use. Failures are surfaced verbatim to the caller.
pub trait SourceHistoryClient: Send + Sync {
    fn get_workflow_execution_raw_history(
        &self,
        request: GetRawHistoryRequest,
    ) -> SourceFuture<'_, GetRawHistoryResponse>;
}
