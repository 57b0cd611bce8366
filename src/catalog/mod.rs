//! Catalog cache
//!
//! Holds the derived level sets and the product list as one immutable snapshot.
//! Refreshes are numbered when issued; a finished refresh only replaces the
//! snapshot if nothing newer has been installed, so the last-issued fetch wins
//! even when responses arrive out of order.

pub mod source;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use chrono::{DateTime, Utc};
use crate::domain::aggregates::{sanitize, CategoryHierarchy, Product};
use crate::domain::events::CatalogEvent;
use crate::Result;

pub use source::{CatalogSource, HttpCatalogSource};

#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    /// Token of the refresh that produced this snapshot; 0 before the first one.
    pub token: u64,
    pub hierarchy: CategoryHierarchy,
    pub products: Vec<Product>,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(u64);

impl RefreshToken {
    pub fn value(self) -> u64 { self.0 }
}

#[derive(Debug, Default)]
pub struct CatalogCache {
    issued: AtomicU64,
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogCache {
    pub fn new() -> Self { Self::default() }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn begin_refresh(&self) -> RefreshToken { RefreshToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1) }

    /// Installs the result of the refresh identified by `token` unless a newer one is already in place.
    pub fn complete(&self, token: RefreshToken, hierarchy: CategoryHierarchy, products: Vec<Product>) -> CatalogEvent {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if token.0 <= current.token {
            return CatalogEvent::Discarded { token: token.0, current: current.token };
        }
        let event = CatalogEvent::Installed {
            token: token.0, categories: hierarchy.counts(), excluded: hierarchy.excluded(), products: products.len(),
        };
        *current = Arc::new(CatalogSnapshot { token: token.0, hierarchy, products, fetched_at: Some(Utc::now()) });
        event
    }
}

pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    cache: CatalogCache,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self { Self { source, cache: CatalogCache::new() } }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> { self.cache.snapshot() }

    /// Fetches categories and products together and installs them as one snapshot.
    pub async fn refresh(&self) -> Result<CatalogEvent> {
        let token = self.cache.begin_refresh();
        tracing::debug!(token = token.value(), "catalog refresh started");
        let (categories, products) = tokio::try_join!(self.source.fetch_categories(), self.source.fetch_products())?;
        let hierarchy = CategoryHierarchy::from_payload(sanitize(categories));
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| {
                let usable = !p.id.trim().is_empty();
                if !usable { tracing::warn!(name = %p.name, "dropping product without id"); }
                usable
            })
            .collect();
        let event = self.cache.complete(token, hierarchy, products);
        match &event {
            CatalogEvent::Installed { token, categories, excluded, products } => {
                tracing::info!(token, ?categories, excluded, products, "catalog snapshot installed")
            }
            CatalogEvent::Discarded { token, current } => {
                tracing::warn!(token, current, "discarding refresh that finished after a newer one")
            }
        }
        Ok(event)
    }
}
