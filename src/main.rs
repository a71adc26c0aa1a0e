use clap::Parser;
use fine_collection::config::cli::load_violations;
use fine_collection::utils::error::{ErrorSeverity, FineError};
use fine_collection::utils::{logger, validation::Validate};
use fine_collection::{
    CliConfig, FineCollectionEngine, HttpBindingDispatcher, HttpVehicleRegistry,
    TracingAuditSink, ViolationProcessor,
};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &FineError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.severity()));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting fine-collection");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        fail(&e);
    }
    let config = cli.service_config().unwrap_or_else(|e| fail(&e));
    let violations = load_violations(&cli.violations).unwrap_or_else(|e| fail(&e));

    // 建立協作者與處理器
    let client = reqwest::Client::builder()
        .timeout(config.registry_timeout().max(config.dispatch_timeout()))
        .build()?;
    let registry =
        HttpVehicleRegistry::new(client.clone(), &config.registry.endpoint).unwrap_or_else(|e| fail(&e));
    let dispatcher = HttpBindingDispatcher::with_operation(
        client,
        config.dispatch.endpoint.clone(),
        config.dispatch.operation.clone(),
    );
    let processor = ViolationProcessor::with_settings(
        registry,
        dispatcher,
        TracingAuditSink,
        config.processor_settings(),
    );

    let engine = FineCollectionEngine::new(processor, config.processing.concurrent_violations);
    let report = engine.run(violations).await;

    for processed in &report.processed {
        println!(
            "✅ {}: {} sent to {}",
            processed.license_number, processed.fine, processed.recipient
        );
    }
    for failed in &report.failed {
        tracing::error!("💡 {}: {}", failed.license_number, failed.error.recovery_suggestion());
        eprintln!(
            "❌ {}: {}",
            failed.license_number,
            failed.error.user_friendly_message()
        );
    }
    println!(
        "📊 {} of {} violation(s) processed",
        report.processed.len(),
        report.total()
    );

    // 以最嚴重的錯誤決定退出碼
    if let Some(severity) = report.failed.iter().map(|f| f.error.severity()).max() {
        let code = exit_code(severity);
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}
