use crate::domain::model::{CalculationRequest, CalculationResult, Product, ShippingBox};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

/// The remote inventory and packing service.
#[async_trait]
pub trait ShippingApi: Send + Sync {
    async fn fetch_inventory(&self) -> Result<Vec<Product>>;
    async fn fetch_boxes(&self) -> Result<Vec<ShippingBox>>;
    async fn calculate_shipping(&self, request: &CalculationRequest) -> Result<CalculationResult>;
}
