// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Domain metadata cache interface.
//!
//! Tenants are addressed by opaque domain ID everywhere inside the
//! platform, but the source-cluster history RPC is keyed on the
//! human-readable domain name. [`DomainCache`] is the lookup seam; the
//! production implementation wraps the platform's shared metadata cache.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Type alias for boxed domain lookups.
pub type DomainFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, DomainCacheError>> + Send + 'a>>;

/// Errors from domain metadata lookups.
#[derive(Debug, Clone, Error)]
pub enum DomainCacheError {
    /// No domain registered under this ID.
    #[error("domain {0} not found")]
    NotFound(String),

    /// The lookup itself failed (backing store unavailable, etc.).
    #[error("domain lookup failed: {0}")]
    Lookup(String),
}

/// Resolved domain metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainInfo {
    pub id: String,
    pub name: String,
}

/// Domain ID to metadata resolution.
///
/// Implementations must be safe for concurrent use; lookups are expected to
/// be cheap (cached) since one fires per history fetch.
pub trait DomainCache: Send + Sync {
    fn get_domain(&self, domain_id: &str) -> DomainFuture<'_, DomainInfo>;
}

/// Fixed in-memory domain table for tests and standalone tooling.
#[derive(Debug, Default, Clone)]
pub struct StaticDomainCache {
    domains: HashMap<String, DomainInfo>,
}

impl StaticDomainCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain, replacing any existing entry for the same ID.
    pub fn insert(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        self.domains.insert(
            id.clone(),
            DomainInfo {
                id,
                name: name.into(),
            },
        );
        self
    }
}

impl DomainCache for StaticDomainCache {
    fn get_domain(&self, domain_id: &str) -> DomainFuture<'_, DomainInfo> {
        let result = self
            .domains
            .get(domain_id)
            .cloned()
            .ok_or_else(|| DomainCacheError::NotFound(domain_id.to_string()));
        Box::pin(async move { result })
    }
}
