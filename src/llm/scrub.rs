use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Bare token prefixes: Gemini keys, Anthropic keys, JWTs (backend anon keys
/// and session access tokens).
const PREFIX_PATTERNS: [&str; 3] = ["AIza", "sk-ant-", "eyJ"];

/// Markers followed by a secret value.
const MARKER_PATTERNS: [&str; 8] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "key=",
    "apikey: ",
    "x-api-key: ",
    "\"apikey\":\"",
    "\"access_token\":\"",
    "\"refresh_token\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_secret_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Match {
    /// `marker` labels the secret that follows it; the label is kept.
    Marker,
    /// `marker` is the first part of the secret itself, so it only counts at
    /// the start of a token ("heyJoe" is not a JWT).
    TokenPrefix,
}

fn starts_token(input: &str, at: usize) -> bool {
    input[..at]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_ascii_alphanumeric())
}

/// Redact every token following `marker`.
fn scrub_after(scrubbed: &mut String, marker: &str, kind: Match) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        if kind == Match::TokenPrefix && !starts_token(scrubbed, start) {
            search_from = content_start;
            continue;
        }
        let end = token_end(scrubbed, content_start);

        // Bare marker without a value.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        let replace_from = match kind {
            Match::Marker => content_start,
            Match::TokenPrefix => start,
        };
        scrubbed.replace_range(replace_from..end, REDACTED);
        search_from = replace_from + REDACTED.len();
    }
}

/// Scrub API keys and bearer tokens from upstream error strings.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let needs_scrubbing = PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|pattern| input.contains(pattern));
    if !needs_scrubbing {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS {
        scrub_after(&mut scrubbed, marker, Match::Marker);
    }
    for prefix in PREFIX_PATTERNS {
        scrub_after(&mut scrubbed, prefix, Match::TokenPrefix);
    }
    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let truncated: String = scrubbed.chars().take(MAX_API_ERROR_CHARS).collect();
    format!("{truncated}...")
}
