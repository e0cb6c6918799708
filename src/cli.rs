use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "coach-relay")]
#[command(about = "Chat relay between client apps and a DeepSeek-compatible completion API", long_about = None)]
pub struct Args {
    #[arg(short = 'p', long = "port", help = "Port for the embedded HTTP listener")]
    pub port: Option<u16>,

    #[arg(long = "memory-dir", help = "Directory holding per-user conversation files")]
    pub memory_dir: Option<PathBuf>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(short = 'c', long = "config", help = "Path to a YAML or JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,
}
