//! Live-search trigger and result formatting.
//!
//! The trigger is a heuristic: a keyword list plus a set of phrasing
//! patterns. False positives only cost one search call and false
//! negatives only mean an answer without fresh context.

use crate::truncation::truncate_chars;
use nx_domain::trace::TraceEvent;
use nx_providers::{SearchProvider, SearchResult};
use regex::{RegexSet, RegexSetBuilder};
use std::time::Instant;

/// Substrings that suggest the user wants current information.
pub const LIVE_KEYWORDS: &[&str] = &[
    "latest", "recent", "today", "current", "now", "news", "update", "happening", "trending",
    "live", "weather", "score", "aaj", "abhi", "price", "stock", "2024", "2025", "2026",
];

/// Temporal, price, weather, and sports-result phrasing, including
/// transliterated Hindi cues.
pub const LIVE_PATTERNS: &[&str] = &[
    r"\b(who|which team)\s+(won|is winning|scored)\b",
    r"\b(match|game|final)\s+(result|results|highlights)\b",
    r"\bweather\s+(in|at|for)\b",
    r"\b(forecast|temperature|rain)\b.*\b(tomorrow|tonight|this week)\b",
    r"\b(price|rate|cost)\s+of\b",
    r"\bhow much (is|does)\b.*\b(cost|worth)\b",
    r"\b(bitcoin|btc|ethereum|sensex|nifty|dollar rate)\b",
    r"\b(yesterday|tomorrow|tonight|this morning)\b",
    r"\b(this|last|next)\s+(week|month|year)\b",
    r"\belection\s+(results?|updates?)\b",
    r"\b(aaj|kal)\s+ka\b",
    r"\bkya\s+chal\s+raha\b",
    r"\babhi\s+kya\b",
];

/// Classifies user messages as needing live data.
///
/// Build once at startup; the compiled pattern set is shared read-only.
#[derive(Debug, Clone)]
pub struct LiveSearchTrigger {
    keywords: Vec<String>,
    patterns: RegexSet,
}

impl LiveSearchTrigger {
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_rules(LIVE_KEYWORDS, LIVE_PATTERNS)
    }

    pub fn with_rules(keywords: &[&str], patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            patterns,
        })
    }

    /// True when `query` looks like it needs real-time information.
    pub fn needs_live_search(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
            || self.patterns.is_match(&lowered)
    }
}

/// Format search hits as bullets separated by blank lines.
pub fn format_results(results: &[SearchResult], content_chars: usize) -> String {
    results
        .iter()
        .map(|r| {
            let (content, _) = truncate_chars(r.content.trim(), content_chars);
            let mut bullet = format!("• {}: {}...", r.title.trim(), content);
            if !r.url.trim().is_empty() {
                bullet.push_str("\n  Source: ");
                bullet.push_str(r.url.trim());
            }
            bullet
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Run one search and format the results.
///
/// Never fails: any search error is logged and yields an empty string.
pub async fn fetch_live_context(
    search: &dyn SearchProvider,
    query: &str,
    max_results: usize,
    content_chars: usize,
) -> String {
    let started = Instant::now();
    let outcome = search.search(query, max_results).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    let (context, results, ok) = match outcome {
        Ok(results) => (format_results(&results, content_chars), results.len(), true),
        Err(e) => {
            tracing::warn!(provider = search.provider_id(), error = %e, "live search failed");
            (String::new(), 0, false)
        }
    };

    TraceEvent::LiveSearch {
        query_chars: query.chars().count(),
        results,
        duration_ms,
        ok,
    }
    .emit();

    context
}
