//! Output formatting utilities.

use derepr_canonical::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Formats one entry as a single JSON line with the key as canonical text.
pub fn format_json_line(key_text: &str, value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serde_json::json!({
        "key": key_text,
        "value": value,
    }))
}

/// Formats an entry as a simple table row.
pub fn format_table_row(key_text: &str, value_text: &str) -> String {
    format!("{:<32} {}", truncate(key_text, 32), truncate(value_text, 80))
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<32} {}", "KEY", "VALUE");
    println!("{}", "-".repeat(113));
}

// Canonical text is ASCII, so byte slicing stays on char boundaries.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_cells_are_truncated() {
        let row = format_table_row(&"k".repeat(40), "1");
        assert!(row.starts_with(&format!("{}...", "k".repeat(29))));
        assert!(row.ends_with(" 1"));
    }

    #[test]
    fn json_line_keeps_key_text() {
        let line = format_json_line("(u'a', 1)", &Value::from(2)).unwrap();
        assert_eq!(line, r#"{"key":"(u'a', 1)","value":2}"#);
    }
}
