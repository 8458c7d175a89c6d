// crates/mailtriage-server/src/analysis/fences.rs
// Markdown code fence removal for model output

const FENCE: &str = "```";

/// Strip a leading fence (with or without a language tag) and a trailing fence.
///
/// Each marker is removed independently, so an unbalanced fence is still
/// handled. Runs to a fixpoint: the result never starts or ends with a fence,
/// which makes the function idempotent.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    loop {
        let mut next = text;
        if let Some(rest) = strip_leading_fence(next) {
            next = rest.trim_start();
        }
        if let Some(rest) = next.strip_suffix(FENCE) {
            next = rest.trim_end();
        }
        if next.len() == text.len() {
            return text;
        }
        text = next;
    }
}

/// Remove "```" plus an optional language tag such as `json` or `JSON`
fn strip_leading_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(FENCE)?;
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
        .unwrap_or(rest.len());
    Some(&rest[tag_len..])
}
