use crate::record::Record;
use regex::{Regex, RegexBuilder};

/// A run of text, flagged when it matched the active query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Match(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(t) | Span::Match(t) => t,
        }
    }
}

/// Compiled matcher budget; pasted walls of text are rejected.
const MATCHER_SIZE_LIMIT: usize = 1 << 20;

/// Case-insensitive literal matcher; regex metacharacters in the query
/// are escaped.
fn build_matcher(query: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .size_limit(MATCHER_SIZE_LIMIT)
        .build()
}

/// Records whose note or content contains `query`, keeping their
/// relative order. A blank query, or one that cannot be compiled,
/// returns the collection unfiltered.
pub fn filter(items: &[Record], query: &str) -> Vec<Record> {
    let query = query.trim();
    if query.is_empty() {
        return items.to_vec();
    }
    let matcher = match build_matcher(query) {
        Ok(m) => m,
        Err(err) => {
            tracing::warn!(%err, query, "search pattern rejected; showing all items");
            return items.to_vec();
        }
    };
    items
        .iter()
        .filter(|r| matcher.is_match(&r.note) || matcher.is_match(&r.content))
        .cloned()
        .collect()
}

/// Split `text` into plain and matched runs for display.
pub fn highlight(text: &str, query: &str) -> Vec<Span> {
    let query = query.trim();
    if text.is_empty() {
        return Vec::new();
    }
    let matcher = match (query.is_empty(), build_matcher(query)) {
        (false, Ok(m)) => m,
        _ => return vec![Span::Plain(text.to_string())],
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for found in matcher.find_iter(text) {
        if found.start() > last {
            spans.push(Span::Plain(text[last..found.start()].to_string()));
        }
        spans.push(Span::Match(found.as_str().to_string()));
        last = found.end();
    }
    if last < text.len() {
        spans.push(Span::Plain(text[last..].to_string()));
    }
    spans
}
