// Sanitize patient-supplied text before it is interpolated into a prompt.
// Removes invisible Unicode, strips the prompt's data-delimiting tags,
// drops prompt-injection lines, normalizes whitespace.

use std::sync::LazyLock;

use regex::Regex;

/// Tags the prompt uses to fence patient data. User text must never contain them.
static DATA_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*/?\s*(?:patient_input|report)\b[^>]*>").unwrap());

/// Sanitize free text for prompt interpolation.
///
/// Injection removals are logged by count only (never content).
pub fn sanitize_user_text(raw: &str, field: &'static str) -> String {
    let cleaned = remove_invisible_chars(raw);
    let (untagged, tags) = strip_data_tags(&cleaned);
    let (no_injection, removed) = remove_injection_lines(&untagged);

    if tags > 0 {
        tracing::warn!(field, removed_tags = tags, "Data delimiter tags removed from user input");
    }
    if removed > 0 {
        tracing::warn!(
            field,
            removed_lines = removed,
            "Injection patterns removed from user input"
        );
    }

    normalize_whitespace(&no_injection)
}

fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(*c, ' ' | '\n' | '\t' | '\r') {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

/// Remove `<patient_input>` / `<report>` open and close tags. Returns (text, tag_count).
fn strip_data_tags(text: &str) -> (String, usize) {
    let count = DATA_TAG.find_iter(text).count();
    if count == 0 {
        return (text.to_string(), 0);
    }
    (DATA_TAG.replace_all(text, "").into_owned(), count)
}

fn is_role_marker(line: &str) -> bool {
    const MARKERS: &[&str] = &[
        "system:",
        "assistant:",
        "[system]",
        "[assistant]",
        "[inst]",
        "[/inst]",
        "<<sys>>",
        "<system",
        "</system",
        "<instruction",
        "</instruction",
        "note to ai:",
        "new instructions:",
    ];
    MARKERS.iter().any(|m| line.starts_with(m))
}

fn is_override_attempt(line: &str) -> bool {
    const OVERRIDES: &[&str] = &[
        "ignore previous instructions",
        "ignore all instructions",
        "ignore the above instructions",
        "disregard your instructions",
        "disregard all instructions",
        "forget your instructions",
        "forget all instructions",
        "you are no longer",
        "respond with type",
    ];
    OVERRIDES.iter().any(|p| line.contains(p))
}

/// Drop suspicious lines. Returns (cleaned_text, removed_line_count).
fn remove_injection_lines(text: &str) -> (String, usize) {
    let mut kept = Vec::new();
    let mut removed = 0usize;

    for line in text.lines() {
        let lower = line.trim().to_lowercase();
        if is_role_marker(&lower) || is_override_attempt(&lower) {
            removed += 1;
            continue;
        }
        kept.push(line);
    }

    (kept.join("\n"), removed)
}

/// Trim each line and collapse runs of blank lines.
fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev_blank = true;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !prev_blank {
                lines.push("");
            }
            prev_blank = true;
        } else {
            lines.push(trimmed);
            prev_blank = false;
        }
    }

    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}
