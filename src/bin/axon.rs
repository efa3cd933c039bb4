use std::sync::Arc;

use axon_lib::config::{self, AxonConfig, CliAction};
use axon_lib::mcp::{McpServer, ToolHost};
use axon_lib::{load_tools, InvocationEngine};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("axon: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = match AxonConfig::from_env().map_err(|e| e.to_string())? {
        CliAction::Help => {
            print!("{}", config::USAGE);
            return Ok(());
        }
        CliAction::Run(config) => config,
    };
    config::init_tracing();

    let log = Arc::new(config.request_log());
    match log.dir() {
        Some(dir) => tracing::info!("request log directory: {}", dir.display()),
        None => tracing::info!("request log: tracing only"),
    }

    let engine = InvocationEngine::with_log(log).map_err(|e| e.to_string())?;
    let report = load_tools(&config.spec, engine.client())
        .await
        .map_err(|e| e.to_string())?;
    tracing::info!(
        "compiled {} tools from {} ({} operations skipped)",
        report.tools.len(),
        config.spec,
        report.skipped.len()
    );

    if config.list {
        let listing = serde_json::to_string_pretty(&report.tools)
            .map_err(|e| format!("failed to encode tools: {e}"))?;
        println!("{listing}");
        return Ok(());
    }

    let server = Arc::new(McpServer::new(ToolHost::new(report.tools, engine)));
    server
        .serve_stdio()
        .await
        .map_err(|e| format!("stdio server failed: {e}"))
}
