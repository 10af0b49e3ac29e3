//! Turns provider text into a summary / improved-review pair.
//!
//! The line heuristic trusts the provider to put the summary on the first
//! non-blank line.  Nothing enforces that, so [`OutputFormat::Json`] exists
//! to ask for explicit fields; its replies are validated and fall back to the
//! heuristic when they do not hold up.

use serde::Deserialize;

use crate::prompt::OutputFormat;

pub const NO_SUMMARY: &str = "No summary generated.";
pub const NO_IMPROVED_REVIEW: &str = "No improved review generated.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReview {
    pub summary: String,
    pub improved_review: String,
}

/// Parse `text` according to the format the provider was asked for.
pub fn parse_completion(text: &str, format: OutputFormat) -> ParsedReview {
    match format {
        OutputFormat::Lines => parse_lines(text),
        OutputFormat::Json => parse_structured(text).unwrap_or_else(|| {
            tracing::warn!("structured reply did not validate; falling back to line parsing");
            parse_lines(text)
        }),
    }
}

/// Split on `\n`, trim, drop blank lines.  First line is the summary, the
/// rest joined with single spaces is the improved review.
pub fn parse_lines(text: &str) -> ParsedReview {
    let lines: Vec<&str> = text.split('\n').map(str::trim).filter(|l| !l.is_empty()).collect();

    let summary = lines.first().map_or_else(|| NO_SUMMARY.to_owned(), |l| (*l).to_owned());
    let improved_review = if lines.len() > 1 {
        lines[1..].join(" ")
    } else {
        NO_IMPROVED_REVIEW.to_owned()
    };

    ParsedReview { summary, improved_review }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredReview {
    summary: String,
    #[serde(alias = "improved_review")]
    improved_review: String,
}

/// Decode `{"summary": …, "improvedReview": …}`.  Returns `None` unless both
/// fields are present, strings, and non-blank.  A surrounding markdown code
/// fence is tolerated.
pub fn parse_structured(text: &str) -> Option<ParsedReview> {
    let raw: StructuredReview = serde_json::from_str(strip_code_fence(text)).ok()?;
    let summary = raw.summary.trim();
    let improved_review = raw.improved_review.trim();
    if summary.is_empty() || improved_review.is_empty() {
        return None;
    }
    Some(ParsedReview { summary: summary.to_owned(), improved_review: improved_review.to_owned() })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an optional language tag on the opening fence line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
