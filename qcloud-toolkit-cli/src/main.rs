//! Command line entry point for qcloud toolkit
//!
//! Loads the configuration file, sets up logging on stderr and runs one
//! subcommand. Command output (JSON) goes to stdout.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use config::FileConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 日志级别可能来自配置文件，所以配置加载失败时直接写 stderr
    let config = match FileConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.log_level.as_deref().unwrap_or(&config.log.level));

    match commands::run(cli.command, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
