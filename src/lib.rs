//! # History Re-replicator
//!
//! Client-side repair of gaps in cross-cluster replication of workflow
//! execution histories. When the standby side of a workflow notices that
//! history events it needs never arrived — the replication stream skipped
//! them, delivered them out of order, or was truncated — it asks the
//! re-replicator to pull the missing span from the active cluster and
//! re-apply it locally.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                           history-rereplicator                           │
//! │                                                                          │
//! │  ┌─────────────────────┐    ┌────────────────────┐    ┌───────────────┐  │
//! │  │ HistoryRereplicator │───►│ HistoryFetcher     │───►│ DomainCache   │  │
//! │  │ (run chain walk,    │    │ (paginated raw     │    │ (id -> name)  │  │
//! │  │  per-run sender)    │    │  history fetch)    │    └───────────────┘  │
//! │  └─────────────────────┘    └────────────────────┘            │          │
//! │        │         │                                            ▼          │
//! │        │         │ HistorySerializer             ┌─────────────────────┐ │
//! │        │         └──(run-link inspection)        │ SourceHistoryClient │ │
//! │        ▼                                         │ (active cluster)    │ │
//! │  ┌────────────────┐                              └─────────────────────┘ │
//! │  │ HistoryApplier │                                                      │
//! │  │ (standby       │                                                      │
//! │  │  cluster)      │                                                      │
//! │  └────────────────┘                                                      │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The hard part is the multi-run traversal: runs of one workflow form a
//! chain through `ContinuedAsNew` events, and the requested span may cross
//! several runs — or land on a chain with a break in it. See
//! [`rereplicator`] for the walk and [`range`] for the per-run bounds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use history_rereplicator::{
//!     BincodeHistorySerializer, HistoryRereplicator, RereplicationConfig,
//! };
//! use history_rereplicator::apply::NoOpHistoryApplier;
//! use history_rereplicator::domain::StaticDomainCache;
//! # use history_rereplicator::source::{SourceHistoryClient, GetRawHistoryRequest, GetRawHistoryResponse, SourceFuture};
//! # struct RemoteCluster;
//! # impl SourceHistoryClient for RemoteCluster {
//! #     fn get_workflow_execution_raw_history(&self, _r: GetRawHistoryRequest) -> SourceFuture<'_, GetRawHistoryResponse> { unimplemented!() }
//! # }
//!
//! # async fn example() -> history_rereplicator::Result<()> {
//! let rereplicator = HistoryRereplicator::new(
//!     Arc::new(StaticDomainCache::new().insert("domain-id", "domain-name")),
//!     Arc::new(RemoteCluster),
//!     Arc::new(NoOpHistoryApplier),
//!     Arc::new(BincodeHistorySerializer::new()),
//!     RereplicationConfig::default(),
//! )?;
//!
//! rereplicator
//!     .send_multi_workflow_history("domain-id", "wf", "begin-run", 123, "end-run", 20)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! The re-replicator holds no per-call state and no retry machinery: the
//! first failure aborts the call, applied batches stay applied (the
//! destination is idempotent), and retrying the whole span is the caller's
//! decision.

pub mod apply;
pub mod codec;
pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod event;
pub mod fetch;
pub mod metrics;
pub mod range;
pub mod rereplicator;
pub mod source;

// Re-exports for convenience
pub use codec::{BincodeHistorySerializer, HistorySerializer};
pub use config::RereplicationConfig;
pub use domain::{DomainCache, DomainInfo};
pub use error::{RereplicationError, Result};
pub use event::{EventType, HistoryEvent, END_EVENT_ID, FIRST_EVENT_ID};
pub use fetch::HistoryFetcher;
pub use rereplicator::HistoryRereplicator;
