pub mod cli;
pub mod config;
pub mod runner;

use clap::Parser;
use tracing::Instrument;

use cli::Cli;
use common::logger::{TraceId, init_logger, root_span};
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let cfg = args.apply(AppConfig::from_env());

    init_logger("crewwatch", cfg.json_logs);

    let trace_id = TraceId::default();
    tracing::info!(%trace_id, seed = ?cfg.seed, "Starting crewwatch...");

    let mut stdout = std::io::stdout();
    runner::run(&args, &cfg, &mut stdout)
        .instrument(root_span("crewwatch", &trace_id))
        .await
}
