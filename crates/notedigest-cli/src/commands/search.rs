//! Search command

use crate::app::{OutputFormat, SearchArgs};
use crate::output::format_query_digest;
use anyhow::Result;
use notedigest_core::{Config, Pipeline};
use std::path::Path;

pub async fn run(args: SearchArgs, config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load_from(config_path)?;
    config.ensure_credentials()?;

    let query = args.query.join(" ");
    let pipeline = Pipeline::from_config(config)?;
    let digest = pipeline.search_and_summarize(&query, args.limit).await?;

    print!("{}", format_query_digest(&digest, format));
    Ok(())
}
