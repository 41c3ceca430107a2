//! Line-exact encoding of SSE frames.
//!
//! A frame is a run of `field: value` lines closed by a blank line. Multi-line
//! input is split strictly on `\n` and every segment becomes its own prefixed
//! line. Nothing is escaped or re-wrapped.

/// Prefix for comment lines. Clients ignore these.
const COMMENT: &str = ": ";
const DATA: &str = "data: ";
const EVENT: &str = "event: ";
const ID: &str = "id: ";

/// Encodes an event frame: optional `id:`, optional `event:`, then one `data:`
/// line per line of `data`. Only `None` omits a field; `Some("")` writes it empty.
pub fn event(data: &str, event_name: Option<&str>, id: Option<&str>) -> String {
    let mut frame = String::with_capacity(data.len() + 32);

    if let Some(id) = id {
        push_line(&mut frame, ID, id);
    }
    if let Some(event_name) = event_name {
        push_line(&mut frame, EVENT, event_name);
    }
    for line in data.split('\n') {
        push_line(&mut frame, DATA, line);
    }

    frame.push('\n');
    frame
}

/// Encodes a comment frame, one `: ` line per line of `text`.
pub fn comment(text: &str) -> String {
    let mut frame = String::with_capacity(text.len() + 8);

    for line in text.split('\n') {
        push_line(&mut frame, COMMENT, line);
    }

    frame.push('\n');
    frame
}

fn push_line(frame: &mut String, prefix: &str, value: &str) {
    frame.push_str(prefix);
    frame.push_str(value);
    frame.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_with_id_and_name_orders_fields() {
        assert_eq!(
            event("line1\nline2", Some("update"), Some("42")),
            "id: 42\nevent: update\ndata: line1\ndata: line2\n\n"
        );
    }

    #[test]
    fn test_event_without_optional_fields() {
        assert_eq!(event("hello", None, None), "data: hello\n\n");
    }

    #[test]
    fn test_event_with_only_name() {
        assert_eq!(event("x", Some("ping"), None), "event: ping\ndata: x\n\n");
    }

    #[test]
    fn test_event_emits_one_data_line_per_segment() {
        let frame = event("a\n\nb\nc:d", None, None);
        let lines: Vec<&str> = frame.split('\n').collect();

        // four data lines, the blank terminator, and the empty tail after it
        assert_eq!(
            lines,
            vec!["data: a", "data: ", "data: b", "data: c:d", "", ""]
        );
    }

    #[test]
    fn test_empty_data_still_produces_a_data_line() {
        assert_eq!(event("", None, None), "data: \n\n");
    }

    #[test]
    fn test_trailing_newline_yields_empty_data_line() {
        assert_eq!(event("x\n", None, None), "data: x\ndata: \n\n");
    }

    #[test]
    fn test_empty_id_is_still_emitted() {
        assert_eq!(event("x", None, Some("")), "id: \ndata: x\n\n");
    }

    #[test]
    fn test_each_line_carries_exactly_one_prefix() {
        assert_eq!(event(": x", Some("e"), Some("1")), "id: 1\nevent: e\ndata: : x\n\n");
        assert_eq!(comment(""), ": \n\n");
    }

    #[test]
    fn test_comment_splits_on_newlines() {
        assert_eq!(comment("a\nb"), ": a\n: b\n\n");
    }

    #[test]
    fn test_comment_carriage_returns_are_not_separators() {
        assert_eq!(comment("a\r\nb"), ": a\r\n: b\n\n");
    }
}
