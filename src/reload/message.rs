//! Live Reload Message Protocol
//!
//! Inbound JSON messages from the development server. Only one kind drives
//! behavior:
//!
//! - `reload`: snapshot state and reload the page (`reason` is for logs only)
//!
//! A message is a JSON object with a string `type`. Every other `type`, and
//! anything else that arrives on the socket, is `Ignored`.

use serde_json::Value;

/// Notification received over the live reload socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Full page reload
    Reload {
        /// Reason for the reload, when the server sent a string
        reason: Option<String>,
    },

    /// Any other message kind (ping, custom broadcasts, garbage, ...)
    Ignored,
}

impl Notification {
    /// Parse an inbound payload. Malformed payloads are `Ignored`.
    pub fn parse(payload: &str) -> Self {
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                crate::debug!("message"; "ignoring malformed payload: {}", e);
                return Self::Ignored;
            }
        };

        let Some(fields) = value.as_object() else {
            crate::debug!("message"; "ignoring non-object payload");
            return Self::Ignored;
        };

        match fields.get("type").and_then(Value::as_str) {
            Some("reload") => Self::Reload {
                // Non-string reasons still reload
                reason: fields
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            _ => Self::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reload(reason: Option<&str>) -> Notification {
        Notification::Reload {
            reason: reason.map(str::to_owned),
        }
    }

    #[test]
    fn test_reload_with_reason() {
        let msg = Notification::parse(r#"{"type":"reload","reason":"file changed"}"#);
        assert_eq!(msg, reload(Some("file changed")));
    }

    #[test]
    fn test_reload_without_reason() {
        let msg = Notification::parse(r#"{"type":"reload"}"#);
        assert_eq!(msg, reload(None));
    }

    #[test]
    fn test_reload_with_server_timestamp() {
        // The dev server stamps broadcasts with a unix time
        let msg = Notification::parse(r#"{"type":"reload","reason":"x","time":1700000000}"#);
        assert_eq!(msg, reload(Some("x")));
    }

    #[test]
    fn test_non_string_reason_still_reloads() {
        assert_eq!(Notification::parse(r#"{"type":"reload","reason":5}"#), reload(None));
        assert_eq!(
            Notification::parse(r#"{"type":"reload","reason":{"file":"a.go"}}"#),
            reload(None)
        );
        assert_eq!(Notification::parse(r#"{"type":"reload","reason":null}"#), reload(None));
    }

    #[test]
    fn test_other_kinds_ignored() {
        assert_eq!(Notification::parse(r#"{"type":"ping"}"#), Notification::Ignored);
        assert_eq!(
            Notification::parse(r#"{"type":"stats","data":{"clients":2}}"#),
            Notification::Ignored
        );
        assert_eq!(Notification::parse(r#"{"type":"Reload"}"#), Notification::Ignored);
    }

    #[test]
    fn test_malformed_ignored() {
        assert_eq!(Notification::parse("{bad"), Notification::Ignored);
        assert_eq!(Notification::parse(""), Notification::Ignored);
        assert_eq!(Notification::parse("[1,2,3]"), Notification::Ignored);
        assert_eq!(Notification::parse(r#"["reload"]"#), Notification::Ignored);
        assert_eq!(Notification::parse(r#"["reload","why"]"#), Notification::Ignored);
        assert_eq!(Notification::parse(r#""reload""#), Notification::Ignored);
        assert_eq!(Notification::parse(r#"{"reason":"no type"}"#), Notification::Ignored);
        assert_eq!(Notification::parse(r#"{"type":42}"#), Notification::Ignored);
    }
}
