use std::path::PathBuf;

use clap::Parser;

/// Portico: run browsers on an embedded engine host.
#[derive(Parser, Debug)]
#[command(name = "portico", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (e.g. debug, or a full filter like portico=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// URL to open instead of the configured start URL.
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Number of browsers to open.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub browsers: usize,

    /// Render handler kind to request instead of the configured one.
    #[arg(long)]
    pub render_handler: Option<String>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
