use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressMessage {
    pub message: String,
}

impl ProgressMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds a message from the event's arguments. A `message` field of any
    /// type is shown as text (null as an empty line); a payload without the
    /// field is kept as its raw JSON so it still shows up.
    pub fn from_args(args: &[Value]) -> Self {
        let Some(payload) = args.first() else {
            return Self::new(String::new());
        };

        match payload.get("message") {
            Some(Value::String(text)) => Self::new(text.clone()),
            Some(Value::Null) => Self::new(String::new()),
            Some(other) => Self::new(other.to_string()),
            None => Self::new(payload.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Connecting,
    Connected,
    Progress(ProgressMessage),
    Disconnected(Option<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_message_field() {
        let message = ProgressMessage::from_args(&[json!({"message": "Parsing rows..."})]);
        assert_eq!(message, ProgressMessage::new("Parsing rows..."));
    }

    #[test]
    fn non_string_message_is_shown_as_text() {
        let message = ProgressMessage::from_args(&[json!({"message": 42})]);
        assert_eq!(message.message, "42");

        let message = ProgressMessage::from_args(&[json!({"message": null})]);
        assert_eq!(message.message, "");
    }

    #[test]
    fn keeps_unrecognized_payloads() {
        let message = ProgressMessage::from_args(&[json!({"percent": 40})]);
        assert_eq!(message.message, r#"{"percent":40}"#);

        let message = ProgressMessage::from_args(&[]);
        assert_eq!(message.message, "");
    }
}
