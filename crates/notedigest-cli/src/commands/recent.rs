//! Recent digest command

use crate::app::{OutputFormat, RecentArgs};
use crate::output::format_period_summary;
use anyhow::Result;
use notedigest_core::{Config, Pipeline, RecentOptions};
use std::path::Path;

pub async fn run(args: RecentArgs, config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load_from(config_path)?;
    config.ensure_credentials()?;

    let options = RecentOptions {
        days_back: args.days,
        importance: args.importance,
        category: args.category,
        max_pages: args.max_pages,
        sort_by: args.sort_by.into(),
    };

    let pipeline = Pipeline::from_config(config)?;
    let result = pipeline.recent_digest(options).await?;

    print!("{}", format_period_summary(&result, format));
    Ok(())
}
