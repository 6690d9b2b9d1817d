//! Read-through orchestration.
//!
//! Reads consult the per-kind cache first and fall back to the store on a
//! miss, caching whatever the store returned. Misses in the store are never
//! cached, and store failures are returned as-is rather than answered from
//! cached data.

use crate::cache::{CacheRegistry, Snapshot};
use crate::logging::logged;
use adventure_config::{CacheConfig, FindAllPolicy};
use adventure_core::AdventureResult;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Cache-first reads over a [`CacheRegistry`].
#[derive(Debug, Clone)]
pub struct ReadThrough {
    registry: Arc<CacheRegistry>,
    policy: FindAllPolicy,
}

impl ReadThrough {
    /// Creates the orchestration over a shared registry.
    #[must_use]
    pub fn new(registry: Arc<CacheRegistry>, policy: FindAllPolicy) -> Self {
        Self { registry, policy }
    }

    /// Creates the orchestration with the configured collection policy.
    #[must_use]
    pub fn from_config(registry: Arc<CacheRegistry>, config: &CacheConfig) -> Self {
        Self::new(registry, config.find_all_policy)
    }

    /// The registry the reads go through.
    #[must_use]
    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    /// The active collection policy.
    #[must_use]
    pub const fn policy(&self) -> FindAllPolicy {
        self.policy
    }

    /// Returns one snapshot, loading and caching it on a miss.
    pub async fn find_by_id<S, F, Fut>(&self, id: S::Id, load: F) -> AdventureResult<Option<S>>
    where
        S: Snapshot,
        F: FnOnce(S::Id) -> Fut,
        Fut: Future<Output = AdventureResult<Option<S>>>,
    {
        logged("find_by_id", S::KIND, async {
            if let Some(hit) = self.registry.get::<S>(id) {
                debug!(kind = %S::KIND, %id, "cache hit");
                return Ok(Some(hit));
            }

            debug!(kind = %S::KIND, %id, "cache miss, loading from store");
            let loaded = load(id).await?;
            if let Some(snapshot) = &loaded {
                self.registry.put(snapshot.clone());
            }
            Ok(loaded)
        })
        .await
    }

    /// Returns the whole collection of one kind.
    ///
    /// With [`FindAllPolicy::CacheFirst`] a non-empty cache is the answer.
    /// With [`FindAllPolicy::Reconcile`] it is the answer only if it holds as
    /// many entries as `count` reports for the store. Otherwise `load_all`
    /// runs and every loaded snapshot is cached. `count` is only awaited under
    /// the reconcile policy.
    pub async fn find_all<S, L, C>(&self, load_all: L, count: C) -> AdventureResult<Vec<S>>
    where
        S: Snapshot,
        L: Future<Output = AdventureResult<Vec<S>>>,
        C: Future<Output = AdventureResult<u64>>,
    {
        logged("find_all", S::KIND, async {
            let mut cached = self.registry.all::<S>();

            if !cached.is_empty() {
                let warm = match self.policy {
                    FindAllPolicy::CacheFirst => true,
                    FindAllPolicy::Reconcile => {
                        let stored = count.await?;
                        let matches = u64::try_from(cached.len()).is_ok_and(|len| len == stored);
                        if !matches {
                            debug!(
                                kind = %S::KIND,
                                cached = cached.len(),
                                stored,
                                "cached collection out of step with store, reloading"
                            );
                        }
                        matches
                    }
                };

                if warm {
                    cached.sort_by_key(|snapshot| snapshot.id());
                    return Ok(cached);
                }
            }

            let loaded = load_all.await?;
            debug!(kind = %S::KIND, count = loaded.len(), "caching collection loaded from store");
            for snapshot in &loaded {
                self.registry.put(snapshot.clone());
            }
            Ok(loaded)
        })
        .await
    }
}
