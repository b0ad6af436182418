//! Markdown output formatter

use notedigest_core::{PeriodSummaryResult, QueryDigest};

pub fn format_query_digest(digest: &QueryDigest) -> String {
    let mut output = format!("# Digest: {}\n\n", digest.query);
    output.push_str(&digest.result.summary);
    output.push_str("\n\n");

    if !digest.result.recent_records.is_empty() {
        output.push_str("## Recent records\n\n");
        for record in &digest.result.recent_records {
            output.push_str(&format!(
                "- **{}** ({}, {} relevance)\n",
                record.title, record.date, record.relevance
            ));
            if !record.content.is_empty() {
                output.push_str(&format!("  {}\n", record.content));
            }
        }
        output.push('\n');
    }

    let older = &digest.result.older_records;
    if older.count > 0 {
        output.push_str("## Older records\n\n");
        output.push_str(&format!("{} records from {}", older.count, older.period));
        if !older.summary.is_empty() {
            output.push_str(&format!(": {}", older.summary));
        }
        output.push_str("\n\n");
    }

    output.push_str(&format!(
        "---\n\n*{} documents in {}ms*\n",
        digest.documents.len(),
        digest.elapsed_ms
    ));

    output
}

pub fn format_period_summary(result: &PeriodSummaryResult) -> String {
    // the period summary is itself Markdown; keep it intact under a header
    let mut output = format!(
        "# Notes digest: {} to {}\n\n",
        result.period.start_date, result.period.end_date
    );
    output.push_str(&result.summary);
    output.push_str("\n\n");
    output.push_str(&format!(
        "---\n\n*{} days, {} of {} records summarized*\n",
        result.period.days_analyzed,
        result.pages_processed.processed,
        result.pages_processed.total_found
    ));

    output
}
