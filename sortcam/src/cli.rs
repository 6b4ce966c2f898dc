use std::path::PathBuf;

use clap::Parser;
use edge_config::Source;

/// `sortcam` CLI (spec.md §6): two flags, both optional.
#[derive(Debug, Parser)]
#[command(name = "sortcam", version, about = "Real-time detection-and-tracking edge pipeline")]
pub struct Cli {
    /// Path to the pipeline config YAML document.
    #[arg(long, default_value = "config/pipeline.yaml")]
    pub cfg: PathBuf,

    /// Overrides the config file's `source` key: an integer is a camera
    /// id, anything else a file path.
    #[arg(long)]
    pub source: Option<Source>,
}
