use crate::ReferenceError;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref TRAILING_COMMA: Regex = Regex::new(r",\s*\]").unwrap();
}

/// Parses a pasted or file-loaded reference list into raw entries
///
/// Accepted shapes, tried in order:
/// 1. A JSON array (`["https://a.com", "cp:/news/.*"]`)
/// 2. A lenient JSON array: trailing comma before `]` and single quotes
/// 3. Line-based text: one entry per non-empty line, with surrounding
///    whitespace, commas and quotes trimmed and bare `[` / `]` lines dropped
///
/// Non-string array items are kept in their JSON text form.
pub fn parse_reference_list(text: &str) -> Result<Vec<String>, ReferenceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ReferenceError::Empty);
    }

    if let Some(entries) = parse_json_array(text) {
        return Ok(entries);
    }

    let lenient = TRAILING_COMMA.replace_all(text, "]").replace('\'', "\"");
    if let Some(entries) = parse_json_array(&lenient) {
        return Ok(entries);
    }

    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            line.trim()
                .trim_matches(|c| c == ',' || c == '\'' || c == '"')
                .to_string()
        })
        .filter(|line| !line.is_empty() && line != "[" && line != "]")
        .collect();

    if lines.is_empty() {
        Err(ReferenceError::Unparseable)
    } else {
        Ok(lines)
    }
}

fn parse_json_array(text: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}
