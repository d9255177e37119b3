//! Oncall incident report grouper.
//!
//! Reads an incident report export, normalizes each incident title by
//! stripping the issue-number and tag columns, and prints how often each
//! title occurs. Standalone; shares nothing with the migration pipeline.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Default report file, as exported from the issue tracker.
const DEFAULT_ISSUES_FILE: &str = "issues.xml";

/// Matches the `[#123] [tag] ` prefix the tracker prepends to each title.
static TITLE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[#\d+\]\s+\[.*?\]\s+").expect("title prefix regex"));

/// Strip the issue-number and tag columns from a raw incident title.
fn normalize_title(raw: &str) -> String {
    TITLE_PREFIX_RE.replace(raw.trim(), "").into_owned()
}

/// Extract the normalized incident titles from a report document.
///
/// Each incident row carries its title in an anchor inside a
/// `td.incident` cell; rows without that shape are ignored.
fn extract_titles(content: &str) -> Vec<String> {
    let document = Html::parse_document(content);
    let selector = Selector::parse("td.incident a").expect("incident selector");

    document
        .select(&selector)
        .map(|anchor| normalize_title(&anchor.text().collect::<String>()))
        .collect()
}

/// Count occurrences per title, most frequent first.
///
/// Ties are broken by title so repeated runs print identically.
fn group_titles(titles: Vec<String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for title in titles {
        *counts.entry(title).or_insert(0) += 1;
    }

    let mut grouped: Vec<(String, usize)> = counts.into_iter().collect();
    grouped.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    grouped
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let issues_file =
        env::var("ISSUES_FILE").unwrap_or_else(|_| DEFAULT_ISSUES_FILE.to_string());

    let content = match fs::read_to_string(&issues_file) {
        Ok(content) => content,
        Err(e) => {
            error!(file = %issues_file, error = %e, "Failed to read report file");
            return;
        }
    };

    let titles = extract_titles(&content);
    info!(file = %issues_file, entries = titles.len(), "Parsed incident report");

    for (title, count) in group_titles(titles) {
        println!("{}\n{}", title, count);
    }
}
