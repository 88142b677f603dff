//! metrix-agent - metrics sampling and delivery agent

#![allow(missing_docs)]

use clap::Parser;
use metrix_rs::agent::{self, TrackingAllocator};
use metrix_rs::config::AgentArgs;
use metrix_rs::utils::logging::{TracingLogger, init_tracing};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = AgentArgs::parse();

    let config = match args.into_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    println!("{}", metrix_rs::build_info());

    let cancel = CancellationToken::new();
    let logger = TracingLogger::shared("agent");
    tokio::spawn(agent::cancel_on_signal(
        tokio::signal::ctrl_c(),
        cancel.clone(),
        logger.clone(),
    ));

    match agent::run(config, cancel, logger).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
