// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Paginated raw-history fetching.
//!
//! [`HistoryFetcher`] is a thin call-through to the source-cluster RPC with
//! exactly one piece of logic of its own: the RPC is keyed on domain name,
//! so every fetch first resolves `domain_id -> name` through the domain
//! cache. Everything else — branch token, event range, page token, page
//! size — is forwarded unchanged, and RPC failures surface verbatim.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::domain::{DomainCache, DomainCacheError};
use crate::error::{RereplicationError, Result};
use crate::metrics;
use crate::source::{GetRawHistoryRequest, GetRawHistoryResponse, SourceHistoryClient};

/// Fetches pages of raw history for a single run range.
pub struct HistoryFetcher {
    domain_cache: Arc<dyn DomainCache>,
    source: Arc<dyn SourceHistoryClient>,
}

impl HistoryFetcher {
    pub fn new(domain_cache: Arc<dyn DomainCache>, source: Arc<dyn SourceHistoryClient>) -> Self {
        Self {
            domain_cache,
            source,
        }
    }

    /// Fetch one page of raw history for `[first_event_id, next_event_id)`
    /// of the given run.
    ///
    /// `branch_token` and `page_token` must be `None` on the first page and
    /// the values echoed by the previous response afterwards.
    #[allow(clippy::too_many_arguments)]
    pub async fn get_history(
        &self,
        domain_id: &str,
        workflow_id: &str,
        run_id: &str,
        branch_token: Option<Vec<u8>>,
        first_event_id: i64,
        next_event_id: i64,
        page_token: Option<Vec<u8>>,
        page_size: i32,
    ) -> Result<GetRawHistoryResponse> {
        let domain = self
            .domain_cache
            .get_domain(domain_id)
            .await
            .map_err(|e| match e {
                DomainCacheError::NotFound(domain_id) => {
                    RereplicationError::DomainNotFound { domain_id }
                }
                DomainCacheError::Lookup(message) => {
                    RereplicationError::fetch(workflow_id, run_id, message)
                }
            })?;

        let request = GetRawHistoryRequest {
            domain: domain.name,
            workflow_id: workflow_id.to_string(),
            run_id: run_id.to_string(),
            branch_token,
            first_event_id,
            next_event_id,
            maximum_page_size: page_size,
            next_page_token: page_token,
        };

        let operation = if page_size == 1 { "peek" } else { "page" };
        let started = Instant::now();
        let response = self
            .source
            .get_workflow_execution_raw_history(request)
            .await
            .map_err(|e| RereplicationError::fetch(workflow_id, run_id, e.0))?;
        metrics::record_fetch(operation, response.history_batches.len(), started.elapsed());

        debug!(
            workflow_id = %workflow_id,
            run_id = %run_id,
            first_event_id,
            next_event_id,
            batches = response.history_batches.len(),
            has_more_pages = response.has_more_pages(),
            "fetched raw history page"
        );
        Ok(response)
    }
}
