//! `nerud`, the Neru daemon.

use std::env;
use std::path::PathBuf;

use neru::config::Config;
use neru::{daemon, platform};

fn print_usage() {
    eprintln!("nerud - keyboard-driven cursor control daemon");
    eprintln!();
    eprintln!("Usage: nerud [--config <path>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>   Configuration file (default: ~/.config/neru/config.toml)");
    eprintln!("  --help            Show this help");
}

fn config_path_from_args(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    daemon::init_logger("/tmp/neru.log");

    let config_path = config_path_from_args(&args)
        .or_else(Config::file_path)
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
    log::info!("starting nerud with config {}", config_path.display());

    daemon::run(config_path, platform::default_collaborators())?;
    Ok(())
}
