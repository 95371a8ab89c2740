//! Fenced-code extraction and module-prelude handling.
//!
//! Pulling code out of a fenced block and prepending a profile-default
//! prelude when the candidate lacks one are kept as two separate, independently
//! testable operations rather than one combined step.

/// Wrap `code` in a fenced block tagged with `tag`, the inverse of
/// [`extract_fenced`] for any string containing no fence.
pub fn wrap_in_fence(code: &str, tag: &str) -> String {
    format!("```{tag}\n{code}\n```\n")
}

/// Extract the interior of the first fenced code block in `text`.
///
/// If `text` contains no fence, it is returned unchanged (trimmed of
/// surrounding whitespace is NOT performed here — callers decide that).
pub fn extract_fenced(text: &str) -> String {
    let Some(start) = text.find("```") else {
        return text.to_string();
    };
    let after_open = &text[start + 3..];
    // Skip the fence-tag token (e.g. "go") up to the first newline.
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    match body.find("```") {
        Some(end) => body[..end].to_string(),
        None => body.to_string(),
    }
}

/// Extract every fenced code block in `text`, each returned together with its
/// fences intact — one entry per block.
pub fn extract_all_fenced(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("```") {
        let after_open = &rest[start + 3..];
        let Some(tag_end) = after_open.find('\n') else {
            break;
        };
        let body = &after_open[tag_end + 1..];
        let Some(close) = body.find("```") else {
            break;
        };
        let block_end = tag_end + 1 + close + 3;
        blocks.push(rest[start..start + 3 + block_end].to_string());
        rest = &after_open[tag_end + 1 + close + 3..];
    }
    blocks
}

/// Apply the profile's default module prelude if `code` doesn't already
/// declare a package/module identity. `has_declaration` is profile-specific
/// (e.g. "starts with `package `" for Go); callers supply it so this helper
/// stays language-agnostic.
pub fn ensure_prelude(code: &str, prelude: &str, has_declaration: impl Fn(&str) -> bool) -> String {
    let trimmed = code.trim_start();
    if has_declaration(trimmed) {
        code.to_string()
    } else {
        format!("{prelude}{code}")
    }
}
