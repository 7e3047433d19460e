//! Form state for one calculator session.
//!
//! All mutable state lives in [`ShippingForm`]. Result and error display are
//! a single [`DisplayState`] so they can never be shown together.

use crate::core::loader::{Inventory, LoadedData};
use crate::domain::model::{
    CalculationRequest, CalculationResult, DimensionUnit, ShippingBox, WeightUnit,
};
use crate::utils::error::ShippingError;
use std::num::IntErrorKind;
use thiserror::Error;

pub const CALCULATION_FAILED_MESSAGE: &str = "Error calculating shipping. Please try again.";

/// Local checks that stop a submission before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select both a product and a box.")]
    MissingSelection,

    #[error("Selected product or box is not valid.")]
    UnresolvedSelection,
}

impl From<FormError> for ShippingError {
    fn from(e: FormError) -> Self {
        ShippingError::ValidationError {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DisplayState {
    #[default]
    Idle,
    Error(String),
    Result(CalculationResult),
}

impl DisplayState {
    pub fn error(&self) -> Option<&str> {
        match self {
            DisplayState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            DisplayState::Result(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub product: Option<String>,
    pub box_name: Option<String>,
    pub quantity: u64,
    pub unit: DimensionUnit,
    pub weight_unit: WeightUnit,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            product: None,
            box_name: None,
            quantity: 1,
            unit: DimensionUnit::default(),
            weight_unit: WeightUnit::default(),
        }
    }
}

/// Parses typed quantity text. Anything that is not a positive integer
/// becomes 1.
///
/// Only the leading integer is read, so `"7kg"` is 7 and `"3.9"` is 3.
/// Values past `u64::MAX` saturate.
pub fn parse_quantity(input: &str) -> u64 {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    if negative || digits.is_empty() {
        return 1;
    }

    match digits.parse::<u64>() {
        Ok(0) => 1,
        Ok(quantity) => quantity,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(_) => 1,
    }
}

/// A request ready to send, tagged with its submission number.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub seq: u64,
    pub request: CalculationRequest,
}

#[derive(Debug, Clone, Default)]
pub struct ShippingForm {
    inventory: Inventory,
    boxes: Vec<ShippingBox>,
    selection: Selection,
    display: DisplayState,
    last_seq: u64,
}

impl ShippingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(inventory: Inventory, boxes: Vec<ShippingBox>) -> Self {
        Self {
            inventory,
            boxes,
            ..Self::default()
        }
    }

    pub fn apply_loaded(&mut self, data: LoadedData) {
        self.inventory = data.inventory;
        self.boxes = data.boxes;
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn product_options(&self) -> Vec<&str> {
        self.inventory.names().collect()
    }

    pub fn box_options(&self) -> &[ShippingBox] {
        &self.boxes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn select_product(&mut self, name: &str) {
        self.selection.product = non_empty(name);
    }

    pub fn select_box(&mut self, name: &str) {
        self.selection.box_name = non_empty(name);
    }

    /// Returns the quantity actually stored.
    pub fn set_quantity_input(&mut self, input: &str) -> u64 {
        self.selection.quantity = parse_quantity(input);
        self.selection.quantity
    }

    pub fn set_dimension_unit(&mut self, unit: DimensionUnit) {
        self.selection.unit = unit;
    }

    pub fn set_weight_unit(&mut self, unit: WeightUnit) {
        self.selection.weight_unit = unit;
    }

    pub fn build_request(&self) -> Result<CalculationRequest, FormError> {
        let (Some(product_name), Some(box_name)) =
            (&self.selection.product, &self.selection.box_name)
        else {
            return Err(FormError::MissingSelection);
        };

        let product = self.inventory.get(product_name);
        let shipping_box = self.boxes.iter().find(|b| &b.box_name == box_name);

        let (Some(product), Some(shipping_box)) = (product, shipping_box) else {
            return Err(FormError::UnresolvedSelection);
        };

        Ok(CalculationRequest {
            shape: product.shape.clone(),
            dimensions: product.dimensions.clone(),
            unit: self.selection.unit,
            weight: product.weight.clone(),
            weight_unit: self.selection.weight_unit,
            quantity: self.selection.quantity,
            box_dimensions: shipping_box.dimensions.clone(),
            box_unit: shipping_box.unit.clone(),
        })
    }

    /// Starts a submission. On a local validation failure the error is
    /// displayed and `None` is returned; nothing should be sent.
    ///
    /// Either way any response still in flight becomes stale.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        self.last_seq += 1;
        match self.build_request() {
            Ok(request) => Some(Submission {
                seq: self.last_seq,
                request,
            }),
            Err(e) => {
                tracing::debug!("Submission rejected locally: {}", e);
                self.display = DisplayState::Error(e.to_string());
                None
            }
        }
    }

    /// Applies a calculation outcome. Returns `false` when a newer
    /// submission has started since `seq` was issued.
    pub fn complete_submission(
        &mut self,
        seq: u64,
        outcome: Result<CalculationResult, ShippingError>,
    ) -> bool {
        if seq != self.last_seq {
            tracing::debug!(
                "Discarding stale calculation response #{} (latest #{})",
                seq,
                self.last_seq
            );
            return false;
        }

        self.display = match outcome {
            Ok(result) => DisplayState::Result(result),
            Err(e) => {
                tracing::error!("Error calculating shipping: {}", e);
                DisplayState::Error(CALCULATION_FAILED_MESSAGE.to_string())
            }
        };
        true
    }
}

fn non_empty(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
