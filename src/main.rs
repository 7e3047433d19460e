use clap::Parser;
use shipping_calc::app::console;
use shipping_calc::core::form::DisplayState;
use shipping_calc::core::render;
use shipping_calc::utils::error::{ErrorSeverity, ShippingError};
use shipping_calc::utils::{logger, validation::Validate};
use shipping_calc::{CliConfig, HttpShippingApi, ShippingCalculator, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting shipping-calc");

    // 載入設定檔 (命令列參數優先)
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path).and_then(|file| file.validate().map(|_| file)) {
            Ok(file) => config.merge_file(&file),
            Err(e) => exit_with(&e),
        }
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let api = match HttpShippingApi::from_config(&config) {
        Ok(api) => api,
        Err(e) => exit_with(&e),
    };
    let mut calculator = ShippingCalculator::new(api);

    let summary = calculator.load().await;
    tracing::info!(
        "Loaded {} products and {} boxes",
        summary.products,
        summary.boxes
    );

    if config.list {
        println!("Products:");
        print!("{}", render::render_products(calculator.form()));
        println!("Boxes:");
        print!("{}", render::render_boxes(calculator.form()));
        return Ok(());
    }

    apply_selection(&mut calculator, &config);

    if config.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        if let Err(e) = console::run(&mut calculator, stdin, tokio::io::stdout()).await {
            exit_with(&e);
        }
        return Ok(());
    }

    // 缺少選擇時不送出請求
    if let Err(e) = calculator.form().build_request() {
        exit_with(&ShippingError::from(e));
    }

    match calculator.submit().await {
        DisplayState::Result(result) => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else {
                print!("{}", render::render_result(result));
            }
        }
        DisplayState::Error(message) => {
            eprintln!("❌ {}", message);
            std::process::exit(1);
        }
        DisplayState::Idle => {}
    }

    Ok(())
}

fn apply_selection(calculator: &mut ShippingCalculator<HttpShippingApi>, config: &CliConfig) {
    let form = calculator.form_mut();
    if let Some(product) = &config.product {
        form.select_product(product);
    }
    if let Some(box_name) = &config.box_name {
        form.select_box(box_name);
    }
    if let Some(quantity) = &config.quantity {
        form.set_quantity_input(quantity);
    }
    if let Some(unit) = config.unit {
        form.set_dimension_unit(unit);
    }
    if let Some(unit) = config.weight_unit {
        form.set_weight_unit(unit);
    }
}

fn exit_with(e: &ShippingError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
