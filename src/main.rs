//! verascan - trigger a Veracode sandbox scan of the current directory

use clap::Parser;
use colored::Colorize;
use log::LevelFilter;

mod archive;
mod cli;
mod client;
mod config;
mod error;
mod scan;

use cli::Cli;
use config::Environment;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if !cli.sandbox {
        println!(
            "{}",
            "Veracode: DO NOTHING; no --sandbox flag and nothing else implemented...".yellow()
        );
        return;
    }

    println!("{}", "Veracode: scanning in sandbox...".cyan());

    let result = match Environment::from_process() {
        Ok(env) => cli::sandbox::run(&cli, &env).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        log::error!("FAILED to trigger new veracode scan; {}", err);
        std::process::exit(1);
    }
}

/// Info-level logging for this crate, debug with `--debug`. `RUST_LOG` overrides both.
fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_module("verascan", level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
