//! CLI command handlers

pub mod config;
pub mod recent;
pub mod search;
