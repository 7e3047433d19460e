use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::domain::model::{DimensionUnit, WeightUnit};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "shipping-calc")]
#[command(about = "Pick a product and a box, then ask the shipping service how to pack them")]
pub struct CliConfig {
    /// Shipping service base URL [default: http://localhost:5000]
    #[arg(long, env = "SHIPPING_API_URL")]
    pub base_url: Option<String>,

    /// TOML configuration file; flags given here take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub product: Option<String>,

    #[arg(long = "box")]
    pub box_name: Option<String>,

    /// Quantity as typed; anything but a positive integer counts as 1
    #[arg(long)]
    pub quantity: Option<String>,

    /// Dimension unit: cm or inches
    #[arg(long)]
    pub unit: Option<DimensionUnit>,

    /// Weight unit: kg or pounds
    #[arg(long)]
    pub weight_unit: Option<WeightUnit>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "List product and box options and exit")]
    pub list: bool,

    #[arg(short, long, help = "Read commands from stdin")]
    pub interactive: bool,

    #[arg(long, help = "Print the calculation result as JSON")]
    pub json: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Fills every unset option from the file. Values already given on the
    /// command line are kept.
    pub fn merge_file(&mut self, file: &TomlConfig) {
        if self.base_url.is_none() {
            self.base_url = Some(file.service.base_url.clone());
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = file.service.timeout_seconds;
        }

        let defaults = file.defaults();
        if self.unit.is_none() {
            self.unit = defaults.unit;
        }
        if self.weight_unit.is_none() {
            self.weight_unit = defaults.weight_unit;
        }
        if self.quantity.is_none() {
            self.quantity = defaults.quantity.map(|q| q.to_string());
        }
    }
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", self.base_url())?;

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }

        if self.list && self.interactive {
            return Err(crate::utils::error::ShippingError::ConfigError {
                message: "--list and --interactive cannot be combined".to_string(),
            });
        }

        if let Some(product) = &self.product {
            validation::validate_non_empty_string("product", product)?;
        }
        if let Some(box_name) = &self.box_name {
            validation::validate_non_empty_string("box", box_name)?;
        }

        Ok(())
    }
}
