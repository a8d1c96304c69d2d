//! HTTP stock service client.
//!
//! Uses `reqwest` for HTTP. Product metadata is cached with `moka`; stock
//! levels are always fetched live since they gate every quantity change.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{Product, ProductId, StockRecord};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{StockError, StockOracle};
use crate::config::StockApiConfig;

/// Client for the stock service JSON API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct HttpStockOracle {
    inner: Arc<HttpStockOracleInner>,
}

struct HttpStockOracleInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl std::fmt::Debug for HttpStockOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStockOracle")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpStockOracle {
    /// Create a new stock service client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &StockApiConfig) -> Result<Self, StockError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| StockError::Api {
                    status: 0,
                    message: format!("Invalid API token format: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(HttpStockOracleInner {
                client,
                base_url: with_trailing_slash(config.base_url.clone()),
                products,
            }),
        })
    }

    /// GET a resource below the base URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        id: ProductId,
    ) -> Result<T, StockError> {
        let url = self.inner.base_url.join(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StockError::NotFound(id));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StockError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Stock service returned non-success status"
            );
            return Err(StockError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse stock service response"
            );
            StockError::Parse(e)
        })
    }
}

#[async_trait]
impl StockOracle for HttpStockOracle {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn fetch_stock(&self, id: ProductId) -> Result<StockRecord, StockError> {
        let stock: StockRecord = self.get_json(&format!("stock/{id}"), id).await?;
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn fetch_product(&self, id: ProductId) -> Result<Product, StockError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}"), id).await?;
        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
