use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Arguments shared by both workflow binaries. Every flag has a default, so a
/// bare invocation works from the current directory.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
pub struct CliConfig {
    /// Directory holding the token, config and progress documents
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
