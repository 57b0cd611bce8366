//! Commerce API access

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use crate::config::CommerceApiConfig;
use crate::domain::aggregates::{Category, Product};
use crate::{CatalogError, Result};

/// Where category and product payloads come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<Category>>;
    async fn fetch_products(&self) -> Result<Vec<Product>>;
}

/// The API answers with either a bare list or `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> { Bare(Vec<T>), Wrapped { data: Vec<T> } }

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> { match self { Self::Bare(v) | Self::Wrapped { data: v } => v } }
}

pub struct HttpCatalogSource {
    client: reqwest::Client,
    config: CommerceApiConfig,
}

impl HttpCatalogSource {
    pub fn new(config: CommerceApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String { format!("{}/{}", self.config.base_url.trim_end_matches('/'), path.trim_start_matches('/')) }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.url(path);
        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.config.token { request = request.bearer_auth(token); }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "commerce API request failed");
            return Err(CatalogError::Upstream { status: status.as_u16(), url });
        }
        let listing: Listing<T> = response.json().await?;
        Ok(listing.into_vec())
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_categories(&self) -> Result<Vec<Category>> { self.get_list(&self.config.categories_path).await }
    async fn fetch_products(&self) -> Result<Vec<Product>> { self.get_list(&self.config.products_path).await }
}
