use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "axp",
    about = "Downloads and re-exports game assets listed in a remote content manifest",
    version,
)]
pub struct Cli {
    /// Manifest version code to process.
    pub version_code: String,

    /// Config file path.
    #[arg(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_path: PathBuf,

    /// Disable the content index: reprocess everything, persist nothing.
    #[arg(long)]
    pub no_index: bool,
}
