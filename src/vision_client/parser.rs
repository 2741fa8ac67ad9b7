//! Lenient structured-output parser
//!
//! The oracle replies with free text that should contain exactly one JSON
//! object, possibly wrapped in markdown code fences or commentary. The
//! contract here: locate the first balanced `{...}` span, deserialize it
//! against the assessment schema, and fail with a parse error on any
//! deviation rather than guessing.

use crate::assessment::VisibilityAssessment;
use crate::error::{Error, Result};

/// Parse an oracle reply into a typed assessment
///
/// Fails when the reply contains no balanced JSON object span, or when the
/// span is missing required fields or carries out-of-domain enum values.
pub fn extract_assessment(reply: &str) -> Result<VisibilityAssessment> {
    let span = first_object_span(reply).ok_or_else(|| {
        Error::Parse(format!(
            "no JSON object in oracle reply: {}",
            preview(reply)
        ))
    })?;

    serde_json::from_str(span)
        .map_err(|e| Error::Parse(format!("oracle JSON does not match the assessment schema: {e}")))
}

/// First balanced `{...}` span in the text
///
/// Brace depth is tracked outside JSON strings so that braces inside string
/// values do not unbalance the scan. Returns None when no object opens or
/// the first object never closes.
fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Short reply excerpt for error messages
fn preview(reply: &str) -> &str {
    let end = reply
        .char_indices()
        .nth(120)
        .map(|(i, _)| i)
        .unwrap_or(reply.len());
    &reply[..end]
}
