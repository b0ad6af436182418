//! Config command

use crate::app::{ConfigAction, ConfigArgs};
use anyhow::Result;
use notedigest_core::Config;
use std::path::Path;

pub fn run(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.action {
        ConfigAction::Init => init(config_path),
        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigAction::Show => show(config_path),
    }
}

fn init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    // defaults pick up any NOTEDIGEST_* env vars already set
    let config = Config::load_from(config_path)?;
    config.save_to(config_path)?;

    println!("Wrote starter config to {}", config_path.display());
    println!("Fill in the store token, database id, and model API key.");
    Ok(())
}

fn show(config_path: &Path) -> Result<()> {
    let config = Config::load_from(config_path)?;

    println!("config file:    {}", config_path.display());
    println!();
    println!("store url:      {}", config.notion.url);
    println!("store token:    {}", redact(&config.notion.token));
    println!("database id:    {}", redact(&config.notion.database_id));
    println!("api version:    {}", config.notion.version);
    println!();
    println!("model:          {}", config.gemini.model);
    println!("model url:      {}", config.gemini.url);
    println!("model api key:  {}", redact(&config.gemini.api_key));
    println!("temperature:    {}", config.gemini.temperature);
    println!("output tokens:  {}", config.gemini.max_output_tokens);
    println!();
    println!("retry attempts: {}", config.retry.max_attempts);
    println!("retry base:     {}ms", config.retry.base_delay_ms);
    Ok(())
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "(not set)"
    } else {
        "[set]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_never_echoed() {
        assert_eq!(redact(""), "(not set)");
        assert_eq!(redact("secret-token"), "[set]");
    }
}
