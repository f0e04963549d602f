use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// In-memory word dictionary with JSON snapshot persistence.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "DICT_ADDR", default_value = "127.0.0.1:8080", global = true)]
    pub addr: String,

    /// Snapshot file used by /save and /load, loaded at startup if it exists
    #[arg(long, env = "DICT_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the dictionary over HTTP (default)
    Serve,
    /// Run the sample concurrent workload and exit
    Demo {
        /// Where the demo writes its snapshot
        #[arg(long, default_value = "dictionary.json")]
        path: PathBuf,
    },
}

impl Config {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
