use httpmock::prelude::*;
use serde_json::json;
use shipping_calc::app::console;
use shipping_calc::core::ShippingApi;
use shipping_calc::core::form::{DisplayState, CALCULATION_FAILED_MESSAGE};
use shipping_calc::{HttpShippingApi, ShippingCalculator};

fn mock_catalog(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/getitemdata");
        then.status(200).json_body(json!([
            {"productName": "Widget", "shape": "box", "dimensions": {"length": 5, "breadth": 4, "height": 3}, "weight": 2}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getboxes");
        then.status(200).json_body(json!([
            {"boxName": "Small", "dimensions": {"length": 10, "breadth": 10, "height": 10}, "unit": "cm"}
        ]));
    });
}

fn calculator_for(server: &MockServer) -> ShippingCalculator<HttpShippingApi> {
    ShippingCalculator::new(HttpShippingApi::new(&server.base_url()).unwrap())
}

#[tokio::test]
async fn test_end_to_end_widget_in_small_box() {
    let server = MockServer::start();
    mock_catalog(&server);
    let calculate = server.mock(|when, then| {
        when.method(POST).path("/api/calculate-shipping").json_body(json!({
            "shape": "box",
            "dimensions": {"length": 5, "breadth": 4, "height": 3},
            "unit": "cm",
            "weight": 2,
            "weightUnit": "kg",
            "quantity": 3,
            "boxDimensions": {"length": 10, "breadth": 10, "height": 10},
            "boxUnit": "cm"
        }));
        then.status(200).json_body(json!({
            "cartonSize": {"length": 10, "breadth": 10, "height": 10},
            "weight": {"perCarton": 6},
            "cartonsRequired": 1,
            "distribution": [{"quantity": 1}]
        }));
    });

    let mut calculator = calculator_for(&server);
    let summary = calculator.load().await;
    assert!(summary.inventory_loaded && summary.boxes_loaded);
    assert_eq!(calculator.form().product_options(), vec!["Widget"]);
    assert_eq!(calculator.form().box_options()[0].box_name, "Small");

    let form = calculator.form_mut();
    form.select_product("Widget");
    form.select_box("Small");
    form.set_quantity_input("3");

    let display = calculator.submit().await.clone();

    calculate.assert();
    let result = display.result().expect("calculation result");
    assert_eq!(result.cartons_required, json!(1));
    assert_eq!(result.first_distribution_quantity(), Some(&json!(1)));
}

#[tokio::test]
async fn test_missing_selection_never_calls_calculator() {
    let server = MockServer::start();
    mock_catalog(&server);
    let calculate = server.mock(|when, then| {
        when.method(POST).path("/api/calculate-shipping");
        then.status(200);
    });

    let mut calculator = calculator_for(&server);
    calculator.load().await;

    let display = calculator.submit().await.clone();
    assert_eq!(
        display,
        DisplayState::Error("Please select both a product and a box.".to_string())
    );

    calculator.form_mut().select_product("Widget");
    calculator.form_mut().select_box("Medium");
    let display = calculator.submit().await.clone();
    assert_eq!(
        display,
        DisplayState::Error("Selected product or box is not valid.".to_string())
    );

    calculate.assert_hits(0);
}

#[tokio::test]
async fn test_failed_calculation_clears_previous_result() {
    let server = MockServer::start();
    mock_catalog(&server);
    let mut ok = server.mock(|when, then| {
        when.method(POST).path("/api/calculate-shipping");
        then.status(200).json_body(json!({
            "cartonSize": {"length": 10, "breadth": 10, "height": 10},
            "weight": {"perCarton": 2},
            "cartonsRequired": 1,
            "distribution": [{"quantity": 1}]
        }));
    });

    let mut calculator = calculator_for(&server);
    calculator.load().await;
    calculator.form_mut().select_product("Widget");
    calculator.form_mut().select_box("Small");

    assert!(calculator.submit().await.result().is_some());

    ok.delete();
    server.mock(|when, then| {
        when.method(POST).path("/api/calculate-shipping");
        then.status(503);
    });

    let display = calculator.submit().await;
    assert_eq!(
        display,
        &DisplayState::Error(CALCULATION_FAILED_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn test_load_failure_degrades_silently() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/getitemdata");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getboxes");
        then.status(200).json_body(json!([
            {"boxName": "Small", "dimensions": {"length": 10, "breadth": 10, "height": 10}, "unit": "cm"}
        ]));
    });

    let mut calculator = calculator_for(&server);
    let summary = calculator.load().await;

    assert!(!summary.inventory_loaded);
    assert!(summary.boxes_loaded);
    assert!(calculator.form().product_options().is_empty());
    assert_eq!(calculator.form().box_options().len(), 1);
    assert_eq!(calculator.form().display(), &DisplayState::Idle);
}

#[tokio::test]
async fn test_duplicate_products_collapse_to_last() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/getitemdata");
        then.status(200).json_body(json!([
            {"productName": "Widget", "shape": "box", "dimensions": {}, "weight": 1},
            {"productName": "Gadget", "shape": "box", "dimensions": {}, "weight": 3},
            {"productName": "Widget", "shape": "sphere", "dimensions": {}, "weight": 4}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getboxes");
        then.status(200).json_body(json!([]));
    });

    let mut calculator = calculator_for(&server);
    calculator.load().await;

    let form = calculator.form();
    assert_eq!(form.product_options(), vec!["Widget", "Gadget"]);
    assert_eq!(form.inventory().get("Widget").unwrap().shape, json!("sphere"));
}

#[tokio::test]
async fn test_console_session() {
    let server = MockServer::start();
    mock_catalog(&server);
    let calculate = server.mock(|when, then| {
        when.method(POST)
            .path("/api/calculate-shipping")
            .json_body_partial(r#"{"quantity": 4, "unit": "inches", "weightUnit": "pounds", "boxUnit": "cm"}"#);
        then.status(200).json_body(json!({
            "cartonSize": {"length": 10, "breadth": 10, "height": 10},
            "weight": {"perCarton": 8},
            "cartonsRequired": 2,
            "distribution": [{"quantity": 2}]
        }));
    });

    let mut calculator = calculator_for(&server);
    calculator.load().await;

    let input = b"products\nproduct Widget\nbox Small\nquantity 4\nunit inches\nweight-unit pounds\nbogus\ncalculate\nquit\nshow\n";
    let mut output = Vec::new();
    let display = console::run(&mut calculator, &input[..], &mut output)
        .await
        .unwrap();

    calculate.assert();
    assert!(display.result().is_some());

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("  Widget"));
    assert!(text.contains("Quantity: 4"));
    assert!(text.contains("unknown command 'bogus'"));
    assert!(text.contains("Total Cartons Required: 2"));
}

#[tokio::test]
async fn test_odd_product_record_does_not_empty_inventory() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/getitemdata");
        then.status(200).json_body(json!([
            {"productName": "Widget", "shape": "box", "dimensions": {"length": 5, "breadth": 4, "height": 3}, "weight": 2},
            {"productName": "Gadget", "shape": "box", "dimensions": {"length": 1, "breadth": 1, "height": 1}, "weight": "3"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getboxes");
        then.status(200).json_body(json!([
            {"boxName": "Small", "dimensions": {"length": 10, "breadth": 10, "height": 10}, "unit": "cm"}
        ]));
    });
    let calculate = server.mock(|when, then| {
        when.method(POST)
            .path("/api/calculate-shipping")
            .json_body_partial(r#"{"weight": "3", "quantity": 1}"#);
        then.status(200).json_body(json!({"cartonsRequired": 1}));
    });

    let mut calculator = calculator_for(&server);
    let summary = calculator.load().await;

    assert!(summary.inventory_loaded);
    assert_eq!(calculator.form().product_options(), vec!["Widget", "Gadget"]);

    calculator.form_mut().select_product("Gadget");
    calculator.form_mut().select_box("Small");
    assert!(calculator.submit().await.result().is_some());
    calculate.assert();
}

#[tokio::test]
async fn test_box_options_keep_response_order() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/getitemdata");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getboxes");
        then.status(200).json_body(json!([
            {"boxName": "Large", "dimensions": {"length": 60, "breadth": 40, "height": 40}, "unit": "cm"},
            {"boxName": "Small", "dimensions": {"length": 10, "breadth": 10, "height": 10}, "unit": "cm"},
            {"boxName": "Medium", "dimensions": {"length": 12, "breadth": 10, "height": 8}, "unit": "inches"}
        ]));
    });

    let mut calculator = calculator_for(&server);
    calculator.load().await;

    let names: Vec<_> = calculator
        .form()
        .box_options()
        .iter()
        .map(|b| b.box_name.as_str())
        .collect();
    assert_eq!(names, vec!["Large", "Small", "Medium"]);
}

#[tokio::test]
async fn test_late_response_does_not_overwrite_newer_result() {
    let server = MockServer::start();
    mock_catalog(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/calculate-shipping")
            .json_body_partial(r#"{"quantity": 1}"#);
        then.status(200).json_body(json!({"cartonsRequired": 1}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/calculate-shipping")
            .json_body_partial(r#"{"quantity": 5}"#);
        then.status(200).json_body(json!({"cartonsRequired": 5}));
    });

    let mut calculator = calculator_for(&server);
    calculator.load().await;
    calculator.form_mut().select_product("Widget");
    calculator.form_mut().select_box("Small");

    let older = calculator.form_mut().begin_submission().unwrap();
    calculator.form_mut().set_quantity_input("5");
    let newer = calculator.form_mut().begin_submission().unwrap();

    let newer_outcome = calculator.api().calculate_shipping(&newer.request).await;
    let older_outcome = calculator.api().calculate_shipping(&older.request).await;
    assert!(older_outcome.is_ok());

    let form = calculator.form_mut();
    assert!(form.complete_submission(newer.seq, newer_outcome));
    assert!(!form.complete_submission(older.seq, older_outcome));

    let result = form.display().result().expect("newer result kept");
    assert_eq!(result.cartons_required, json!(5));
}

#[tokio::test]
async fn test_late_failure_does_not_replace_newer_result() {
    let server = MockServer::start();
    mock_catalog(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/calculate-shipping")
            .json_body_partial(r#"{"quantity": 1}"#);
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/calculate-shipping")
            .json_body_partial(r#"{"quantity": 2}"#);
        then.status(200).json_body(json!({"cartonsRequired": 2}));
    });

    let mut calculator = calculator_for(&server);
    calculator.load().await;
    calculator.form_mut().select_product("Widget");
    calculator.form_mut().select_box("Small");

    let older = calculator.form_mut().begin_submission().unwrap();
    calculator.form_mut().set_quantity_input("2");
    let newer = calculator.form_mut().begin_submission().unwrap();

    let older_outcome = calculator.api().calculate_shipping(&older.request).await;
    assert!(older_outcome.is_err());
    let newer_outcome = calculator.api().calculate_shipping(&newer.request).await;

    let form = calculator.form_mut();
    assert!(form.complete_submission(newer.seq, newer_outcome));
    assert!(!form.complete_submission(older.seq, older_outcome));
    assert_eq!(
        form.display().result().map(|r| &r.cartons_required),
        Some(&json!(2))
    );
}
