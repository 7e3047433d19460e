use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// An inventory item as returned by `GET /api/getitemdata`.
///
/// Only the name is interpreted; everything else is forwarded to the
/// calculator as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_name: String,
    #[serde(default)]
    pub shape: Value,
    #[serde(default)]
    pub dimensions: Value,
    #[serde(default)]
    pub weight: Value,
}

/// A shipping container as returned by `GET /api/getboxes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingBox {
    pub box_name: String,
    /// `{length, breadth, height}`
    #[serde(default)]
    pub dimensions: Value,
    #[serde(default)]
    pub unit: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionUnit {
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "inches")]
    Inches,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "pounds")]
    Pounds,
}

impl DimensionUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionUnit::Centimeters => "cm",
            DimensionUnit::Inches => "inches",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DimensionUnit::Centimeters => "Centimeters (cm)",
            DimensionUnit::Inches => "Inches",
        }
    }
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "pounds",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "Kilograms (kg)",
            WeightUnit::Pounds => "Pounds (lbs)",
        }
    }
}

impl fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} unit '{value}' (expected one of: {expected})")]
pub struct UnitParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl FromStr for DimensionUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" | "centimeters" | "centimetres" => Ok(DimensionUnit::Centimeters),
            "in" | "inch" | "inches" => Ok(DimensionUnit::Inches),
            _ => Err(UnitParseError {
                kind: "dimension",
                value: s.to_string(),
                expected: "cm, inches",
            }),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kilograms" => Ok(WeightUnit::Kilograms),
            "lb" | "lbs" | "pounds" => Ok(WeightUnit::Pounds),
            _ => Err(UnitParseError {
                kind: "weight",
                value: s.to_string(),
                expected: "kg, pounds",
            }),
        }
    }
}

/// Body of `POST /api/calculate-shipping`.
///
/// `unit` is the unit the user picked for the product; `box_unit` is the
/// unit stored with the box record. The two are sent independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub shape: Value,
    pub dimensions: Value,
    pub unit: DimensionUnit,
    pub weight: Value,
    pub weight_unit: WeightUnit,
    pub quantity: u64,
    pub box_dimensions: Value,
    pub box_unit: Value,
}

/// Response of `POST /api/calculate-shipping`, kept as sent. Fields this
/// client does not know about end up in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// `{length, breadth, height}`
    #[serde(default)]
    pub carton_size: Value,
    /// `{perCarton, ..}`
    #[serde(default)]
    pub weight: Value,
    #[serde(default)]
    pub cartons_required: Value,
    #[serde(default)]
    pub distribution: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

static NULL: Value = Value::Null;

impl CalculationResult {
    pub fn per_carton(&self) -> &Value {
        self.weight.get("perCarton").unwrap_or(&NULL)
    }

    /// Quantity of the first distribution entry.
    pub fn first_distribution_quantity(&self) -> Option<&Value> {
        self.distribution.first().and_then(|entry| entry.get("quantity"))
    }
}
