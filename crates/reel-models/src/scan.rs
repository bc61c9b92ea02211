//! Candidate video URL extraction from highlight documents.
//!
//! The highlight provider returns an arbitrary, schema-less JSON tree. The
//! scanner walks it and collects every string that looks like a downloadable
//! video URL, in a deterministic order, so the selection step has a stable
//! candidate sequence to draw from.

use serde_json::Value;

/// File extensions treated as downloadable video, matched case-insensitively
/// against the URL path with any query string stripped.
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".m3u8"];

/// Collect every candidate video URL reachable in a highlight document.
///
/// Traversal is depth-first pre-order: object members by map iteration
/// order, array elements by index. Duplicate URLs are kept, so a URL that
/// appears twice carries twice the selection weight.
///
/// Uses an explicit stack rather than recursion so deeply nested documents
/// cannot overflow the call stack. Never fails; a document with no matching
/// strings yields an empty vector.
pub fn scan_candidate_urls(doc: &Value) -> Vec<String> {
    let mut urls = Vec::new();
    let mut stack = vec![doc];

    while let Some(value) = stack.pop() {
        match value {
            // Children are pushed in reverse so they pop in document order.
            Value::Object(map) => stack.extend(map.values().rev()),
            Value::Array(items) => stack.extend(items.iter().rev()),
            Value::String(s) => {
                if is_candidate_url(s) {
                    urls.push(s.clone());
                }
            }
            _ => {}
        }
    }

    urls
}

/// Heuristic for "looks like a downloadable video URL".
///
/// A candidate starts with `http` and either carries a known video extension
/// (checked against the path, ignoring any query string) or mentions `video`
/// anywhere in the string.
pub fn is_candidate_url(s: &str) -> bool {
    if !s.starts_with("http") {
        return false;
    }
    has_video_extension(s) || s.contains("video")
}

fn has_video_extension(url: &str) -> bool {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_ascii_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
