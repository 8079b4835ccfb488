//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::inventory::Stage;

/// Content production pipeline CLI.
#[derive(Parser, Debug)]
#[command(name = "slidecast")]
#[command(about = "Quota-aware slide image generation and pipeline inventory tracking")]
#[command(version)]
pub struct Args {
    /// Show API quota status for all accounts
    #[arg(long)]
    pub status: bool,

    /// Rescan every project under the projects directory
    #[arg(short, long)]
    pub scan: bool,

    /// Rescan a single project by name
    #[arg(short, long)]
    pub project: Option<String>,

    /// Show the production inventory dashboard
    #[arg(short, long)]
    pub dashboard: bool,

    /// List projects with pending work at a stage
    #[arg(long, value_enum, value_name = "STAGE")]
    pub pending: Option<Stage>,

    /// Check whether remaining quota covers N requests
    #[arg(long, value_name = "N")]
    pub check_capacity: Option<u32>,

    /// Generate slide images for a project's prompts
    #[arg(short, long, value_name = "PROJECT")]
    pub generate: Option<String>,

    /// Projects directory
    #[arg(long, default_value = "_projects")]
    pub projects_dir: PathBuf,

    /// API accounts config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Quota state file
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Image-generation API base URL
    #[arg(long, default_value = "https://imagegen.googleapis.com")]
    pub api_url: String,

    /// Write an example config file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Quota state file path, defaulting under the user's home directory.
    pub fn state_path(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".slidecast")
                .join("api_state.json")
        })
    }
}
