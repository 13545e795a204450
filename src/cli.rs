use crate::tracing::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "conduit-interfaces", version)]
#[command(
    about = "Generate interfaces.json describing every Conduit API method",
    long_about = None
)]
pub struct Cli {
    /// Registry sources: conduit.query JSON, TOML manifests, directories of
    /// either, or `-` for JSON on stdin. Reads stdin when none are given.
    #[arg(env = "CONDUIT_INTERFACES_REGISTRY", value_delimiter = ',')]
    pub registry: Vec<String>,

    /// Write the schema to this file instead of stdout. A previous output
    /// inside a registry directory is not read back as a registry.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
