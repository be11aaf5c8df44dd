// src/common/response/parse.rs

use super::{display_text, DisplayText, Outcome, Reply, FAILURE_TEXT, SUCCESS_TEXT};
use crate::common::framer::RawLine;

// Values the host uses in its `status` field to acknowledge a probe.
const PROBE_ACK_STATUS: [&[u8]; 3] = [b"success", b"pong", b"ready"];

// --- Internal Helpers ---
#[inline]
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

#[inline]
fn skip_spaces(payload: &[u8], mut pos: usize) -> usize {
    while payload.get(pos).is_some_and(|b| *b == b' ') {
        pos += 1;
    }
    pos
}

/// Value of the first well-formed `"key":"value"` pair in `payload`.
///
/// The value runs from the quote after the colon to the next quote that is not
/// escaped with a backslash, and is returned without unescaping. Occurrences of
/// the key that are not followed by a string value are skipped.
pub fn field<'a>(payload: &'a [u8], key: &str) -> Option<&'a [u8]> {
    let key = key.as_bytes();
    let mut search_from = 0;

    while let Some(start) = find(payload, b"\"", search_from) {
        search_from = start + 1;
        let key_end = start + 1 + key.len();
        if payload.get(start + 1..key_end) != Some(key) || payload.get(key_end) != Some(&b'"') {
            continue;
        }

        let colon = skip_spaces(payload, key_end + 1);
        if payload.get(colon) != Some(&b':') {
            continue;
        }
        let open = skip_spaces(payload, colon + 1);
        if payload.get(open) != Some(&b'"') {
            continue;
        }

        let value_start = open + 1;
        let mut escaped = false;
        for (offset, &b) in payload[value_start..].iter().enumerate() {
            match b {
                b'\\' if !escaped => escaped = true,
                b'"' if !escaped => return Some(&payload[value_start..value_start + offset]),
                _ => escaped = false,
            }
        }
        // Unterminated value: nothing later in the payload can be well-formed.
        return None;
    }
    None
}

/// Classifies a reply line. Never fails.
pub fn classify(line: &RawLine) -> Reply {
    let payload = line.as_bytes();

    if let Some(value) = field(payload, "result") {
        return Reply {
            text: display_text(value),
            outcome: Outcome::Result,
        };
    }

    if find(payload, b"success", 0).is_some() {
        Reply {
            text: display_text(SUCCESS_TEXT.as_bytes()),
            outcome: Outcome::Success,
        }
    } else {
        Reply {
            text: display_text(FAILURE_TEXT.as_bytes()),
            outcome: Outcome::Failure,
        }
    }
}

/// Display text for a reply line: the `result` value, or a canned verdict.
pub fn extract(line: &RawLine) -> DisplayText {
    classify(line).text
}

/// True if `line` acknowledges a probe.
pub fn is_probe_ack(line: &RawLine) -> bool {
    if let Some(status) = field(line.as_bytes(), "status") {
        if PROBE_ACK_STATUS
            .iter()
            .any(|ack| status.eq_ignore_ascii_case(ack))
        {
            return true;
        }
    }
    classify(line).outcome == Outcome::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::response::DISPLAY_TEXT_MAX;

    fn line(s: &str) -> RawLine {
        RawLine::try_from(s.as_bytes()).unwrap()
    }

    #[test]
    fn test_result_field() {
        assert_eq!(extract(&line(r#"{"result":"OK"}"#)).as_str(), "OK");
        assert_eq!(
            classify(&line(r#"{"command":"POWER_ON","status":"success","result":"ON"}"#)),
            Reply {
                text: display_text(b"ON"),
                outcome: Outcome::Result,
            }
        );
    }

    #[test]
    fn test_result_field_with_spaces() {
        assert_eq!(
            extract(&line(r#"{"status": "success", "result": "Power on sent"}"#)).as_str(),
            "Power on sent"
        );
    }

    #[test]
    fn test_result_value_keeps_escapes() {
        let text = extract(&line(r#"{"result":"said \"hi\"\nbye"}"#));
        assert_eq!(text.as_str(), r#"said \"hi\"\nbye"#);
    }

    #[test]
    fn test_result_truncated_to_display_length() {
        let long = "x".repeat(120);
        let text = extract(&line(&format!(r#"{{"result":"{}"}}"#, long)));
        assert_eq!(text.len(), DISPLAY_TEXT_MAX);
    }

    #[test]
    fn test_empty_result_is_still_a_result() {
        let reply = classify(&line(r#"{"result":""}"#));
        assert_eq!(reply.outcome, Outcome::Result);
        assert!(reply.text.is_empty());
    }

    #[test]
    fn test_status_success_without_result() {
        let reply = classify(&line(r#"{"command":"SCAN","status":"success"}"#));
        assert_eq!(reply.outcome, Outcome::Success);
        assert_eq!(reply.text.as_str(), SUCCESS_TEXT);
    }

    #[test]
    fn test_garbage_is_failure() {
        for junk in ["}}}{{{", "\"result", "result:OK", "\"result\":42", "~~~~", "\"result\":\"unterminated"] {
            let reply = classify(&line(junk));
            assert_eq!(reply.outcome, Outcome::Failure, "input: {}", junk);
            assert_eq!(reply.text.as_str(), FAILURE_TEXT);
        }
    }

    #[test]
    fn test_result_key_as_value_is_skipped() {
        let text = extract(&line(r#"{"kind":"result","result":"real"}"#));
        assert_eq!(text.as_str(), "real");
    }

    #[test]
    fn test_success_heuristic_matches_free_text() {
        // Kept as observed: any mention of "success" counts.
        let reply = classify(&line("no success today"));
        assert_eq!(reply.outcome, Outcome::Success);
    }

    #[test]
    fn test_field_lookup() {
        let payload = br#"{"command":"PING","status":"pong","timestamp":1.5}"#;
        assert_eq!(field(payload, "status"), Some(&b"pong"[..]));
        assert_eq!(field(payload, "command"), Some(&b"PING"[..]));
        assert_eq!(field(payload, "timestamp"), None);
        assert_eq!(field(payload, "missing"), None);
    }

    #[test]
    fn test_probe_ack() {
        assert!(is_probe_ack(&line(r#"{"command":"PING","status":"pong","timestamp":1}"#)));
        assert!(is_probe_ack(&line(r#"{"status":"ready","message":"CEC Flipper Control ready"}"#)));
        assert!(is_probe_ack(&line(r#"{"status":"success"}"#)));
        assert!(is_probe_ack(&line("success")));
        assert!(!is_probe_ack(&line(r#"{"status":"error","message":"Unknown command: PING"}"#)));
        assert!(!is_probe_ack(&line("garbage")));
    }
}
