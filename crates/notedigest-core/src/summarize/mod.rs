//! LLM summarization
//!
//! Prompt assembly, the model client, and defensive parsing of whatever
//! text the model sends back. Content-shape problems never leave this
//! module as errors; they degrade to fallback results.

mod gemini;
pub mod parse;
mod prompt;

pub use gemini::{GeminiClient, SummaryModel};
pub use prompt::{
    escape_prompt_text, period_prompt, query_prompt, PeriodPromptParams, PERIOD_PROMPT_MAX_DOCS,
    QUERY_PROMPT_MAX_DOCS,
};
