//! Configuration for the history re-replicator.
//!
//! There isn't much to tune: re-replication is request-scoped and carries
//! no background machinery. The config is passed to
//! [`HistoryRereplicator::new()`](crate::HistoryRereplicator::new) and can
//! be constructed programmatically or deserialized from YAML/JSON.
//!
//! ```rust
//! use history_rereplicator::config::RereplicationConfig;
//!
//! let config = RereplicationConfig {
//!     page_size: 50,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RereplicationError, Result};

/// Tunables for one re-replicator instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RereplicationConfig {
    /// Maximum batches requested per raw-history page.
    ///
    /// The single-event peeks used for run-link discovery always use page
    /// size 1 regardless of this value.
    #[serde(default = "default_page_size")]
    pub page_size: i32,

    /// Upper bound on runs visited in one multi-run call.
    ///
    /// Walking the run chain is expected to converge quickly; hitting this
    /// bound means the chain is cyclic or degenerate and the call fails
    /// rather than looping.
    #[serde(default = "default_max_chain_hops")]
    pub max_chain_hops: usize,
}

fn default_page_size() -> i32 {
    100
}

fn default_max_chain_hops() -> usize {
    1000
}

impl Default for RereplicationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_chain_hops: default_max_chain_hops(),
        }
    }
}

impl RereplicationConfig {
    /// Small pages and a tight chain bound, for exercising pagination in
    /// tests.
    pub fn for_testing() -> Self {
        Self {
            page_size: 2,
            max_chain_hops: 8,
        }
    }

    /// Reject configurations the traversal cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size < 1 {
            return Err(RereplicationError::Config(format!(
                "page_size must be positive, got {}",
                self.page_size
            )));
        }
        if self.max_chain_hops == 0 {
            return Err(RereplicationError::Config(
                "max_chain_hops must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
