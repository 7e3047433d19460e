pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::HttpShippingApi;
pub use crate::core::{calculator::ShippingCalculator, form::ShippingForm};
pub use utils::error::{Result, ShippingError};
