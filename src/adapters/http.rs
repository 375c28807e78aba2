use crate::core::{ConfigProvider, Product, ProductCatalog, Stock, StockService};
use crate::domain::model::ProductId;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Storefront REST API: `GET {base}/stock/{id}` and `GET {base}/products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    client: Client,
    base_url: Url,
}

impl HttpStorefront {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // 確保結尾有 `/`，否則 Url::join 會取代最後一段路徑
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, product_id: ProductId) -> Result<Url> {
        Ok(self.base_url.join(&format!("{}/{}", resource, product_id))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;

        tracing::debug!("API response status: {}", response.status());
        let response = response.error_for_status()?;

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl StockService for HttpStorefront {
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock> {
        let url = self.endpoint("stock", product_id)?;
        self.get_json(url).await
    }
}

#[async_trait]
impl ProductCatalog for HttpStorefront {
    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let url = self.endpoint("products", product_id)?;
        self.get_json(url).await
    }
}
