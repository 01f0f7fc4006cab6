// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Multi-run history traversal and re-application.
//!
//! [`HistoryRereplicator`] repairs gaps in cross-cluster replication: given
//! a span `(begin_run_id, begin_event_id) .. (end_run_id, end_event_id)` it
//! pulls the missing history from the active cluster and re-applies it
//! locally, walking the continue-as-new chain that links successive runs of
//! the same workflow.
//!
//! ```text
//!  send_multi_workflow_history
//!  ┌────────────────────────────────────────────────────────────────────┐
//!  │ run chain walk (forward via ContinuedAsNew, backward re-anchor     │
//!  │ from the end run when the chain breaks)                            │
//!  │        │ per-run bounds from range::event_id_range                 │
//!  │        ▼                                                           │
//!  │ send_single_workflow_history                                       │
//!  │   page loop ──► HistoryFetcher ──► source cluster                  │
//!  │   batch loop ─► one apply request per batch, held one step so the  │
//!  │                 last request can carry the successor's first batch │
//!  │        ▼                                                           │
//!  │ HistoryApplier ──► destination cluster                             │
//!  └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All traversal state lives on the call stack; a single re-replicator is
//! shared freely between concurrent calls. RPCs are strictly sequential
//! within one call because the applier must observe batches in event order
//! and runs in chain order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::apply::{DataBlob, HistoryApplier, ReplicateRawEventsRequest, ReplicationInfo};
use crate::codec::HistorySerializer;
use crate::config::RereplicationConfig;
use crate::convert;
use crate::domain::DomainCache;
use crate::error::{RereplicationError, Result};
use crate::event::{END_EVENT_ID, FIRST_EVENT_ID};
use crate::fetch::HistoryFetcher;
use crate::metrics;
use crate::range;
use crate::source::SourceHistoryClient;

/// Re-replicates spans of workflow history between clusters.
///
/// Constructed once with its collaborators and reused across invocations;
/// holds no per-call state.
pub struct HistoryRereplicator {
    fetcher: HistoryFetcher,
    applier: Arc<dyn HistoryApplier>,
    serializer: Arc<dyn HistorySerializer>,
    config: RereplicationConfig,
}

impl HistoryRereplicator {
    /// Build a re-replicator from its collaborators.
    ///
    /// Fails if the configuration is invalid.
    pub fn new(
        domain_cache: Arc<dyn DomainCache>,
        source: Arc<dyn SourceHistoryClient>,
        applier: Arc<dyn HistoryApplier>,
        serializer: Arc<dyn HistorySerializer>,
        config: RereplicationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher: HistoryFetcher::new(domain_cache, source),
            applier,
            serializer,
            config,
        })
    }

    /// Send the history span `(begin_run_id, begin_event_id) ..
    /// (end_run_id, end_event_id)` of one workflow to the destination
    /// cluster.
    ///
    /// Walks forward from `begin_run_id` through the continue-as-new chain.
    /// When the chain breaks before reaching `end_run_id` (the two anchors
    /// are not directly linked), the walk re-anchors one step backward from
    /// `end_run_id` using the started event's back-link and resumes.
    ///
    /// The first fetch or apply failure aborts the call; batches applied
    /// before the failure stay applied (the destination is idempotent).
    #[instrument(skip(self, begin_event_id, end_event_id))]
    pub async fn send_multi_workflow_history(
        &self,
        domain_id: &str,
        workflow_id: &str,
        begin_run_id: &str,
        begin_event_id: i64,
        end_run_id: &str,
        end_event_id: i64,
    ) -> Result<()> {
        let result = self
            .send_span(
                domain_id,
                workflow_id,
                begin_run_id,
                begin_event_id,
                end_run_id,
                end_event_id,
            )
            .await;
        if let Err(e) = &result {
            metrics::record_error(e.kind());
            warn!(
                workflow_id = %workflow_id,
                begin_run_id = %begin_run_id,
                end_run_id = %end_run_id,
                error = %e,
                "history re-replication failed"
            );
        }
        result
    }

    async fn send_span(
        &self,
        domain_id: &str,
        workflow_id: &str,
        begin_run_id: &str,
        begin_event_id: i64,
        end_run_id: &str,
        end_event_id: i64,
    ) -> Result<()> {
        let mut sent: HashSet<String> = HashSet::new();

        // The caller may only know the end anchor (a stray event arrived
        // for a run with no local history at all); start one step back from
        // it, or at the end run itself for a chain head.
        let mut current_run_id = if begin_run_id.is_empty() {
            metrics::record_rechain();
            let prev_run_id = self
                .get_prev_run_id(domain_id, workflow_id, end_run_id)
                .await?;
            if prev_run_id.is_empty() {
                end_run_id.to_string()
            } else {
                prev_run_id
            }
        } else {
            begin_run_id.to_string()
        };

        loop {
            if sent.len() >= self.config.max_chain_hops {
                return Err(RereplicationError::CorruptHistory(format!(
                    "run chain from {} to {} did not converge within {} runs",
                    begin_run_id, end_run_id, self.config.max_chain_hops
                )));
            }

            let (first_event_id, next_event_id) = range::event_id_range(
                &current_run_id,
                begin_run_id,
                begin_event_id,
                end_run_id,
                end_event_id,
            );
            let next_run_id = self
                .send_single_workflow_history(
                    domain_id,
                    workflow_id,
                    &current_run_id,
                    first_event_id,
                    next_event_id,
                )
                .await?;
            sent.insert(current_run_id.clone());
            metrics::record_run_sent();

            if current_run_id == end_run_id {
                break;
            }

            if next_run_id.is_empty() {
                // The forward walk stopped short of the end anchor: the
                // span is not contiguous via continue-as-new. Re-anchor on
                // the end run's predecessor and resume from there.
                metrics::record_rechain();
                let prev_run_id = self
                    .get_prev_run_id(domain_id, workflow_id, end_run_id)
                    .await?;
                if prev_run_id.is_empty() || sent.contains(&prev_run_id) {
                    debug!(
                        workflow_id = %workflow_id,
                        end_run_id = %end_run_id,
                        "backward anchor converged, span complete"
                    );
                    break;
                }
                current_run_id = prev_run_id;
            } else {
                if sent.contains(&next_run_id) {
                    return Err(RereplicationError::CorruptHistory(format!(
                        "run {} continues into already-sent run {}",
                        current_run_id, next_run_id
                    )));
                }
                current_run_id = next_run_id;
            }
        }

        metrics::record_span_sent(sent.len());
        Ok(())
    }

    /// Page through one run's history and apply every batch, in order.
    ///
    /// Returns the successor run's ID when the run ended in
    /// continue-as-new, else the empty string.
    ///
    /// Each apply request is held for one iteration before sending: whether
    /// a batch is the run's last is only known once the final page has been
    /// drained, and the last request must carry the successor run's first
    /// batch so the applier can create both runs atomically.
    async fn send_single_workflow_history(
        &self,
        domain_id: &str,
        workflow_id: &str,
        run_id: &str,
        first_event_id: i64,
        next_event_id: i64,
    ) -> Result<String> {
        debug!(
            workflow_id = %workflow_id,
            run_id = %run_id,
            first_event_id,
            next_event_id,
            "sending single run history"
        );

        let mut branch_token: Option<Vec<u8>> = None;
        let mut page_token: Option<Vec<u8>> = None;
        let mut pending_request: Option<ReplicateRawEventsRequest> = None;

        loop {
            let response = self
                .fetcher
                .get_history(
                    domain_id,
                    workflow_id,
                    run_id,
                    branch_token.clone(),
                    first_event_id,
                    next_event_id,
                    page_token.take(),
                    self.config.page_size,
                )
                .await?;
            branch_token = response.branch_token.clone();

            let replication_info = convert::replication_info_from_source(&response.replication_info);
            for batch in &response.history_batches {
                self.send_replication_raw_request(pending_request.take())
                    .await?;
                let history = convert::data_blob_from_source(batch)?;
                pending_request = Some(create_replication_raw_request(
                    domain_id,
                    workflow_id,
                    run_id,
                    history,
                    response.event_store_version,
                    replication_info.clone(),
                ));
            }

            if !response.has_more_pages() {
                break;
            }
            page_token = response.next_page_token;
        }

        let Some(mut request) = pending_request else {
            debug!(workflow_id = %workflow_id, run_id = %run_id, "run range contained no batches");
            return Ok(String::new());
        };

        let next_run_id = self.get_next_run_id(&request.history)?;
        if !next_run_id.is_empty() {
            let (new_run_history, new_run_event_store_version) = self
                .fetch_new_run_first_batch(domain_id, workflow_id, &next_run_id)
                .await?;
            request.new_run_history = Some(new_run_history);
            request.new_run_event_store_version = Some(new_run_event_store_version);
        }
        self.send_replication_raw_request(Some(request)).await?;

        Ok(next_run_id)
    }

    /// Forward an apply request to the destination cluster. A `None`
    /// request is a silent no-op.
    async fn send_replication_raw_request(
        &self,
        request: Option<ReplicateRawEventsRequest>,
    ) -> Result<()> {
        let Some(request) = request else {
            return Ok(());
        };
        let workflow_id = request.workflow_id.clone();
        let run_id = request.run_id.clone();
        let started = Instant::now();
        let result = self.applier.replicate_raw_events(request).await;
        metrics::record_apply(result.is_ok(), started.elapsed());
        result.map_err(|e| RereplicationError::apply(workflow_id, run_id, e.0))
    }

    /// Read the run a blob's last event continued into, or `""` when the
    /// batch does not end in continue-as-new.
    fn get_next_run_id(&self, blob: &DataBlob) -> Result<String> {
        let events = self.serializer.deserialize_batch(blob)?;
        let last_event = events.last().ok_or_else(|| {
            RereplicationError::CorruptHistory("event batch is empty".to_string())
        })?;
        Ok(last_event.new_execution_run_id().unwrap_or("").to_string())
    }

    /// Read the run the given run continued from, or `""` for a chain head.
    ///
    /// Peeks the first batch only (page size 1); the first event of a run
    /// is always the started event, which carries the back-link.
    async fn get_prev_run_id(
        &self,
        domain_id: &str,
        workflow_id: &str,
        run_id: &str,
    ) -> Result<String> {
        let response = self
            .fetcher
            .get_history(
                domain_id,
                workflow_id,
                run_id,
                None,
                FIRST_EVENT_ID,
                END_EVENT_ID,
                None,
                1,
            )
            .await?;
        let batch = response.history_batches.first().ok_or_else(|| {
            RereplicationError::CorruptHistory(format!("run {} has no first batch", run_id))
        })?;
        let blob = convert::data_blob_from_source(batch)?;
        let events = self.serializer.deserialize_batch(&blob)?;
        let first_event = events.first().ok_or_else(|| {
            RereplicationError::CorruptHistory(format!("run {} first batch is empty", run_id))
        })?;
        match &first_event.started_attributes {
            Some(attributes) => Ok(attributes
                .continued_execution_run_id
                .clone()
                .unwrap_or_default()),
            None => Err(RereplicationError::CorruptHistory(format!(
                "run {} does not begin with a started event",
                run_id
            ))),
        }
    }

    /// Fetch the successor run's first batch for attachment to the final
    /// apply request of the run that continued into it.
    async fn fetch_new_run_first_batch(
        &self,
        domain_id: &str,
        workflow_id: &str,
        new_run_id: &str,
    ) -> Result<(DataBlob, i32)> {
        let response = self
            .fetcher
            .get_history(
                domain_id,
                workflow_id,
                new_run_id,
                None,
                FIRST_EVENT_ID,
                END_EVENT_ID,
                None,
                1,
            )
            .await?;
        let batch = response.history_batches.first().ok_or_else(|| {
            RereplicationError::CorruptHistory(format!(
                "new run {} has no first batch",
                new_run_id
            ))
        })?;
        let blob = convert::data_blob_from_source(batch)?;
        let events = self.serializer.deserialize_batch(&blob)?;
        let first_event = events.first().ok_or_else(|| {
            RereplicationError::CorruptHistory(format!(
                "new run {} first batch is empty",
                new_run_id
            ))
        })?;
        if first_event.started_attributes.is_none() {
            return Err(RereplicationError::CorruptHistory(format!(
                "new run {} does not begin with a started event",
                new_run_id
            )));
        }
        Ok((blob, response.event_store_version))
    }
}

/// Build an apply request for one batch of one run. The new-run fields
/// start empty; the single-run sender patches them onto the run's final
/// request when needed.
pub(crate) fn create_replication_raw_request(
    domain_id: &str,
    workflow_id: &str,
    run_id: &str,
    history: DataBlob,
    event_store_version: i32,
    replication_info: HashMap<String, ReplicationInfo>,
) -> ReplicateRawEventsRequest {
    ReplicateRawEventsRequest {
        domain_id: domain_id.to_string(),
        workflow_id: workflow_id.to_string(),
        run_id: run_id.to_string(),
        replication_info,
        history,
        new_run_history: None,
        event_store_version,
        new_run_event_store_version: None,
    }
}
