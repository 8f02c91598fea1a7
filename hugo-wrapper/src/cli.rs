use clap::Parser;
use std::path::PathBuf;

/// Wrapper flags are prefixed or unique so they never shadow hugo's own flags;
/// everything after them is handed to hugo untouched.
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "hugo-wrapper",
    version,
    about = "Run any Hugo version, installing it from GitHub releases on first use",
    long_about = None
)]
pub struct Args {
    /// Hugo version to run
    /// Format: latest[-extended] or [v]MAJOR[.MINOR[.PATCH]][-extended]
    /// Examples: latest, 0.73, v0.72.3-extended
    #[clap(long, env = "HUGO_VERSION", value_name = "VERSION")]
    pub hugo_version: Option<String>,

    /// Directory holding the installed Hugo versions
    #[clap(long, value_name = "DIR")]
    pub install_dir: Option<String>,

    /// Configuration file path
    #[clap(long, value_name = "PATH")]
    pub wrapper_config: Option<PathBuf>,

    /// Skip SHA256 checksum verification of downloaded archives
    #[clap(long)]
    pub skip_checksum: bool,

    /// Maximum number of download retries
    #[clap(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Disable download retries
    #[clap(long, conflicts_with = "max_retries")]
    pub no_retry: bool,

    /// Enable verbose wrapper output
    #[clap(long)]
    pub wrapper_verbose: bool,

    /// Arguments passed to hugo unchanged
    #[clap(
        value_name = "HUGO_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub hugo_args: Vec<String>,
}
