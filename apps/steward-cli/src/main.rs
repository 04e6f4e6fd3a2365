//! Steward - donor-relations task board CLI

use clap::Parser;
use steward_cli::{logging::init_logging, run, Cli};
use steward_core::StewardConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, None)?;

    let config = match &cli.data_dir {
        Some(dir) => StewardConfig::new(dir, true),
        None => StewardConfig::from_env(),
    };

    run(cli.command, &config, &mut std::io::stdout()).await
}
