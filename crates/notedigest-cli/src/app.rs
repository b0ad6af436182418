//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use notedigest_core::SortBy;

#[derive(Parser)]
#[command(name = "notedigest")]
#[command(
    author,
    version,
    about = "Search and summarize your note store from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search notes and summarize the best matches
    Search(SearchArgs),

    /// Summarize the notes of a recent window
    Recent(RecentArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: Vec<String>,

    /// Number of documents to summarize
    #[arg(short = 'n', long = "limit", default_value = "5")]
    pub limit: usize,
}

#[derive(Args)]
pub struct RecentArgs {
    /// Window size in days (capped at 30)
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Importance levels to include, comma separated
    #[arg(long, value_delimiter = ',')]
    pub importance: Option<Vec<String>>,

    /// Only include notes in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Records to pull from the store (capped at 50)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Sort order for the period query
    #[arg(long, value_enum, default_value = "date")]
    pub sort_by: SortOrder,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a starter config file if none exists
    Init,
    /// Print the config file path
    Path,
    /// Show the active configuration with credentials redacted
    Show,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
    Md,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Date,
    Importance,
}

impl From<SortOrder> for SortBy {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Date => SortBy::Date,
            SortOrder::Importance => SortBy::Importance,
        }
    }
}
