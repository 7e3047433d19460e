use crate::core::form::{DisplayState, ShippingForm};
use crate::core::loader::{self, LoadSummary};
use crate::domain::ports::ShippingApi;

/// Drives a [`ShippingForm`] against a [`ShippingApi`].
pub struct ShippingCalculator<A: ShippingApi> {
    api: A,
    form: ShippingForm,
}

impl<A: ShippingApi> ShippingCalculator<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            form: ShippingForm::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn form(&self) -> &ShippingForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ShippingForm {
        &mut self.form
    }

    /// Populates product and box options. Failures leave the lists empty.
    pub async fn load(&mut self) -> LoadSummary {
        tracing::info!("Loading inventory and boxes");
        let data = loader::load(&self.api).await;
        let summary = data.summary;
        self.form.apply_loaded(data);

        if !summary.inventory_loaded || !summary.boxes_loaded {
            tracing::warn!(
                "Selection lists are incomplete (inventory loaded: {}, boxes loaded: {})",
                summary.inventory_loaded,
                summary.boxes_loaded
            );
        }
        summary
    }

    /// Validates the selection, calls the calculator and updates the display.
    pub async fn submit(&mut self) -> &DisplayState {
        if let Some(submission) = self.form.begin_submission() {
            tracing::info!(
                "Calculating shipping for {} x{}",
                submission.request.shape,
                submission.request.quantity
            );
            let outcome = self.api.calculate_shipping(&submission.request).await;
            self.form.complete_submission(submission.seq, outcome);
        }
        self.form.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CalculationRequest, CalculationResult, Product, ShippingBox};
    use crate::utils::error::{Result, ShippingError};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        fail_boxes: bool,
        requests: Mutex<Vec<CalculationRequest>>,
    }

    #[async_trait::async_trait]
    impl ShippingApi for FakeApi {
        async fn fetch_inventory(&self) -> Result<Vec<Product>> {
            Ok(vec![Product {
                product_name: "Widget".to_string(),
                shape: json!("box"),
                dimensions: json!({"length": 5, "breadth": 4, "height": 3}),
                weight: json!(2),
            }])
        }

        async fn fetch_boxes(&self) -> Result<Vec<ShippingBox>> {
            if self.fail_boxes {
                return Err(ShippingError::StatusError {
                    endpoint: "/api/getboxes".to_string(),
                    status: 502,
                });
            }
            Ok(vec![ShippingBox {
                box_name: "Small".to_string(),
                dimensions: json!({"length": 10, "breadth": 10, "height": 10}),
                unit: json!("cm"),
            }])
        }

        async fn calculate_shipping(
            &self,
            request: &CalculationRequest,
        ) -> Result<CalculationResult> {
            self.requests.lock().unwrap().push(request.clone());
            let per_carton = request.weight.as_u64().unwrap_or_default() * request.quantity;
            Ok(serde_json::from_value(json!({
                "cartonSize": request.box_dimensions,
                "weight": {"perCarton": per_carton},
                "cartonsRequired": 1,
                "distribution": [{"quantity": 1}]
            }))?)
        }
    }

    #[test]
    fn test_submit_sends_selection() {
        tokio_test::block_on(async {
            let mut calculator = ShippingCalculator::new(FakeApi::default());
            let summary = calculator.load().await;
            assert_eq!(summary.products, 1);
            assert_eq!(summary.boxes, 1);

            let form = calculator.form_mut();
            form.select_product("Widget");
            form.select_box("Small");
            form.set_quantity_input("3");

            let display = calculator.submit().await;
            assert_eq!(display.result().unwrap().per_carton(), &json!(6));

            let requests = calculator.api().requests.lock().unwrap();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].quantity, 3);
            assert_eq!(requests[0].box_unit, json!("cm"));
        });
    }

    #[test]
    fn test_box_load_failure_blocks_submission_locally() {
        tokio_test::block_on(async {
            let mut calculator = ShippingCalculator::new(FakeApi {
                fail_boxes: true,
                ..FakeApi::default()
            });
            let summary = calculator.load().await;
            assert!(summary.inventory_loaded);
            assert!(!summary.boxes_loaded);

            calculator.form_mut().select_product("Widget");
            calculator.form_mut().select_box("Small");
            let display = calculator.submit().await;

            assert_eq!(display.error(), Some("Selected product or box is not valid."));
            assert!(calculator.api().requests.lock().unwrap().is_empty());
        });
    }
}
