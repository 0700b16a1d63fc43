use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct Run {
    /// Path to the TOML configuration file
    #[arg(long, short)]
    pub config: PathBuf,
}
