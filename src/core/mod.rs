pub mod calculator;
pub mod form;
pub mod loader;
pub mod render;

pub use crate::domain::model::{CalculationRequest, CalculationResult, Product, ShippingBox};
pub use crate::domain::ports::{ConfigProvider, ShippingApi};
pub use crate::utils::error::Result;
