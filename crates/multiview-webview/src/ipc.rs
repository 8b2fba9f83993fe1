//! Message plumbing between the host and page scripts.
//!
//! - **Page -> host**: the page calls
//!   `window.MultiWebviewBridge.postMessage(JSON.stringify(...))`; the string
//!   reaches the surface's `MessageBridge` and is parsed leniently here.
//! - **Host -> page**: the manager evaluates a snippet that dispatches a
//!   `multiwebview-message` `CustomEvent` on `window`, with the payload under
//!   `event.detail.data`.

use serde_json::Value;

/// DOM event name used for host-to-page messages.
pub const MESSAGE_EVENT_NAME: &str = "multiwebview-message";

/// Initialization script injected into every surface that supports it.
/// Exposes `window.MultiWebviewBridge.postMessage(string)`.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    if (window.MultiWebviewBridge) { return; }
    window.MultiWebviewBridge = {
        postMessage: function(message) {
            var body = typeof message === 'string' ? message : JSON.stringify(message);
            window.ipc.postMessage(body);
        }
    };
})();
"#;

/// Escape JSON text for embedding in a single-quoted script context.
///
/// Backslash goes first so the escapes added afterwards are not doubled.
pub fn escape_for_script(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Build the snippet that delivers `payload` to the page.
pub fn message_dispatch_script(payload: &Value) -> String {
    let wrapped = serde_json::json!({ "data": payload });
    let escaped = escape_for_script(&wrapped.to_string());
    format!(
        "(function() {{var event = new CustomEvent('{MESSAGE_EVENT_NAME}', {{detail: {escaped}}});window.dispatchEvent(event);}})();"
    )
}

/// Parse a raw page message. `None` means the page sent something that is
/// not JSON; callers drop it.
pub fn parse_inbound_message(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatch_script_matches_expected_shape() {
        let script = message_dispatch_script(&json!({"x": 1}));
        assert_eq!(
            script,
            "(function() {var event = new CustomEvent('multiwebview-message', {detail: {\"data\":{\"x\":1}}});window.dispatchEvent(event);})();"
        );
        assert!(script.contains(r#"detail: {"data":{"x":1}}"#));
    }

    #[test]
    fn escapes_backslash_before_quotes() {
        assert_eq!(escape_for_script(r"a\b"), r"a\\b");
        assert_eq!(escape_for_script("it's"), r"it\'s");
        assert_eq!(escape_for_script("\\'"), r"\\\'");
    }

    #[test]
    fn escapes_line_breaks() {
        assert_eq!(escape_for_script("a\nb\rc"), r"a\nb\rc");
    }

    #[test]
    fn payload_quotes_and_newlines_are_escaped() {
        // JSON already turns a newline inside a string into `\n`; the escape
        // pass then doubles that backslash.
        let script = message_dispatch_script(&json!({"text": "it's\nfine"}));
        assert!(!script.contains('\n'));
        assert!(!script.contains('\r'));

        let detail = &script[script.find("detail: ").unwrap()..];
        let quotes: Vec<usize> = detail.match_indices('\'').map(|(i, _)| i).collect();
        for i in quotes {
            assert_eq!(&detail[i - 1..i], "\\", "unescaped quote at {i}");
        }
        assert!(detail.contains(r#"it\'s\\nfine"#));
    }

    #[test]
    fn parses_valid_json_only() {
        assert_eq!(parse_inbound_message(r#"{"a":1}"#), Some(json!({"a": 1})));
        assert_eq!(parse_inbound_message("\"hi\""), Some(json!("hi")));
        assert_eq!(parse_inbound_message("{not json"), None);
        assert_eq!(parse_inbound_message(""), None);
    }

    #[test]
    fn bridge_script_forwards_to_ipc() {
        assert!(BRIDGE_INIT_SCRIPT.contains("window.MultiWebviewBridge"));
        assert!(BRIDGE_INIT_SCRIPT.contains("window.ipc.postMessage"));
    }
}
