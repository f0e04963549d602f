use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dico_store::config::{Command, Config};
use dico_store::{Dictionary, Gateway, PersistError, demo, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let config = Config::parse();

    // One store per process, handed explicitly to whoever needs it.
    let dict = Dictionary::new();

    match config.command() {
        Command::Demo { path } => {
            demo::run(&dict, &path, Duration::from_secs(2))
                .with_context(|| format!("demo failed on {}", path.display()))?;
        }
        Command::Serve => {
            let mut gateway = Gateway::new(dict.clone());
            if let Some(path) = &config.snapshot {
                match dict.load(path) {
                    Ok(_) => {}
                    Err(PersistError::Missing { .. }) => {
                        info!("no snapshot at {}, starting empty", path.display());
                    }
                    Err(e) => return Err(e).context("refusing to start over an unreadable snapshot"),
                }
                gateway = gateway.with_snapshot_path(path);
            }
            let srv = server::init_server(&config.addr)?;
            server::run_server(srv, gateway);
        }
    }
    Ok(())
}
