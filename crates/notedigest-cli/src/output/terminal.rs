//! Terminal output formatter

use notedigest_core::{PeriodSummaryResult, QueryDigest};

pub fn format_query_digest(digest: &QueryDigest) -> String {
    let mut output = String::new();

    output.push_str(&digest.result.summary);
    output.push('\n');

    if !digest.result.recent_records.is_empty() {
        output.push('\n');
        for record in &digest.result.recent_records {
            output.push_str(&format!(
                "{:>10} [{}] {}\n",
                record.date, record.relevance, record.title
            ));
            if !record.content.is_empty() {
                output.push_str(&format!("           {}\n", record.content));
            }
        }
    }

    let older = &digest.result.older_records;
    if older.count > 0 {
        output.push('\n');
        output.push_str(&format!("Older: {} from {}", older.count, older.period));
        if !older.summary.is_empty() {
            output.push_str(&format!(" - {}", older.summary));
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format!(
        "{} documents in {}ms\n",
        digest.documents.len(),
        digest.elapsed_ms
    ));
    for doc in &digest.documents {
        output.push_str(&format!("{:>4} #{}\n", doc.score, doc.id));
    }

    output
}

pub fn format_period_summary(result: &PeriodSummaryResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} to {} ({} days)\n",
        result.period.start_date, result.period.end_date, result.period.days_analyzed
    ));
    output.push_str(&format!(
        "{} found, {} usable, {} summarized\n\n",
        result.pages_processed.total_found,
        result.pages_processed.after_filter,
        result.pages_processed.processed
    ));
    output.push_str(&result.summary);
    output.push('\n');

    output
}
