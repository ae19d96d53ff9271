use std::path::PathBuf;

use clap::Parser;

/// Conversational relay in front of a generative language model.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Interface to bind, overriding `server.host`.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding `server.port`.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
