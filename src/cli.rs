use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_INPUT_PATH: &str = "data/raw/year_progress_copy.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "data/interim/year_progress.sqlite";

#[derive(Parser, Debug)]
#[command(
    name = "yearprog",
    version,
    about = "Extract year-progress post statistics from a raw text dump"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Year appended to post dates that carry none.
    #[arg(long, default_value_t = 2019)]
    pub default_year: i32,

    #[arg(long, default_value_t = false)]
    pub disable_year_end_rollback: bool,

    /// Literal line separating posts; may be given more than once.
    #[arg(long = "delimiter")]
    pub delimiters: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

/// Run manifests live next to the table unless a path is given.
pub fn resolve_manifest_path(output: &std::path::Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        output
            .parent()
            .map(|parent| parent.join("year_progress_run.json"))
            .unwrap_or_else(|| PathBuf::from("year_progress_run.json"))
    })
}
