use crate::core::form::{DisplayState, ShippingForm};
use crate::domain::model::{CalculationResult, ShippingBox};
use serde_json::Value;

/// Strings print bare and a missing value prints as nothing.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn dims(d: &Value) -> String {
    format!(
        "{} x {} x {}",
        text(&d["length"]),
        text(&d["breadth"]),
        text(&d["height"])
    )
}

pub fn box_label(shipping_box: &ShippingBox) -> String {
    format!(
        "{} (Dimensions: {} {})",
        shipping_box.box_name,
        dims(&shipping_box.dimensions),
        text(&shipping_box.unit)
    )
}

pub fn render_result(result: &CalculationResult) -> String {
    let distribution = match result.first_distribution_quantity() {
        Some(quantity) => format!("Distribution: {} cartons available", text(quantity)),
        None => "Distribution: none reported".to_string(),
    };

    let lines = [
        "Optimal Packing Result".to_string(),
        format!("Carton Size: {}", dims(&result.carton_size)),
        format!("Weight per Carton: {} kg", text(result.per_carton())),
        format!("Total Cartons Required: {}", text(&result.cartons_required)),
        distribution,
    ];
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

/// `None` while idle.
pub fn render_display(display: &DisplayState) -> Option<String> {
    match display {
        DisplayState::Idle => None,
        DisplayState::Error(message) => Some(format!("Error: {}\n", message)),
        DisplayState::Result(result) => Some(render_result(result)),
    }
}

pub fn render_products(form: &ShippingForm) -> String {
    let options = form.product_options();
    if options.is_empty() {
        return "No products available\n".to_string();
    }
    options
        .iter()
        .map(|name| format!("  {}\n", name))
        .collect()
}

pub fn render_boxes(form: &ShippingForm) -> String {
    let boxes = form.box_options();
    if boxes.is_empty() {
        return "No boxes available\n".to_string();
    }
    boxes
        .iter()
        .map(|shipping_box| format!("  {}\n", box_label(shipping_box)))
        .collect()
}

pub fn render_selection(form: &ShippingForm) -> String {
    let selection = form.selection();
    let mut out = String::new();
    out.push_str(&format!(
        "Product: {}\n",
        selection.product.as_deref().unwrap_or("--Select Product--")
    ));
    out.push_str(&format!(
        "Box: {}\n",
        selection.box_name.as_deref().unwrap_or("--Select Box--")
    ));
    out.push_str(&format!("Quantity: {}\n", selection.quantity));
    out.push_str(&format!("Unit (for dimensions): {}\n", selection.unit.label()));
    out.push_str(&format!("Weight Unit: {}\n", selection.weight_unit.label()));
    out
}
