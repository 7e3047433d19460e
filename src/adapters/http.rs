use crate::domain::model::{CalculationRequest, CalculationResult, Product, ShippingBox};
use crate::domain::ports::{ConfigProvider, ShippingApi};
use crate::utils::error::{Result, ShippingError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

pub const INVENTORY_PATH: &str = "/api/getitemdata";
pub const BOXES_PATH: &str = "/api/getboxes";
pub const CALCULATE_PATH: &str = "/api/calculate-shipping";

/// `ShippingApi` over HTTP/JSON.
///
/// Endpoint paths are appended to the base URL, so a base such as
/// `http://gateway/shipping` keeps its path prefix.
#[derive(Debug, Clone)]
pub struct HttpShippingApi {
    client: Client,
    base_url: String,
}

impl HttpShippingApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = normalize_base_url(config.base_url())?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ShippingError::ConfigError {
            message: format!("cannot build HTTP client: {}", e),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status for {}: {}", path, status);

        if !status.is_success() {
            return Err(ShippingError::StatusError {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        Self::decode(path, response).await
    }

    /// Fetches a JSON array and decodes it record by record. Records that
    /// do not decode are logged and skipped.
    async fn get_records<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let items: Vec<serde_json::Value> = self.get(path).await?;
        let total = items.len();

        let records: Vec<T> = items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping record {} from {}: {}", i, path, e);
                    None
                }
            })
            .collect();

        if records.len() < total {
            tracing::warn!(
                "Kept {} of {} records from {}",
                records.len(),
                total,
                path
            );
        }
        Ok(records)
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    Url::parse(base_url)?;
    Ok(base_url.trim_end_matches('/').to_string())
}

#[async_trait::async_trait]
impl ShippingApi for HttpShippingApi {
    async fn fetch_inventory(&self) -> Result<Vec<Product>> {
        self.get_records(INVENTORY_PATH).await
    }

    async fn fetch_boxes(&self) -> Result<Vec<ShippingBox>> {
        self.get_records(BOXES_PATH).await
    }

    async fn calculate_shipping(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        let url = self.endpoint(CALCULATE_PATH)?;
        tracing::debug!(
            "Posting calculation for shape {} x{} to: {}",
            request.shape,
            request.quantity,
            url
        );
        let response = self.client.post(url).json(request).send().await?;
        Self::decode(CALCULATE_PATH, response).await
    }
}
