use serde::Deserialize;

/// Webhook event payload from the Cloud API. Every nesting level is
/// defaulted so payloads missing any segment (status updates, read
/// receipts, etc.) still deserialize and simply carry no message.
#[derive(Debug, Default, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
struct Change {
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    from: String,

    #[serde(default)]
    text: Option<TextContent>,
}

#[derive(Debug, Deserialize)]
struct TextContent {
    #[serde(default)]
    body: String,
}

/// A single user message pulled out of an InboundEvent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_id: String,
    pub text: String,
}

impl InboundEvent {
    /// The first message at `entry[0].changes[0].value.messages[0]`.
    /// None is "nothing to do", not an error.
    pub fn first_message(&self) -> Option<ChatMessage> {
        let message = self.entry.first()?.changes.first()?.value.messages.first()?;

        Some(ChatMessage {
            sender_id: message.from.clone(),
            text: message
                .text
                .as_ref()
                .map(|text| text.body.clone())
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> InboundEvent {
        serde_json::from_value(value).expect("payload should deserialize")
    }

    #[test]
    fn test_extracts_first_message() {
        let event = parse(json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "0",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "messages": [{
                            "from": "123",
                            "id": "wamid.A",
                            "type": "text",
                            "text": { "body": "What is gravity?" }
                        }]
                    }
                }]
            }]
        }));

        assert_eq!(
            event.first_message(),
            Some(ChatMessage {
                sender_id: "123".to_string(),
                text: "What is gravity?".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_text_body_defaults_to_empty() {
        let event = parse(json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{ "from": "123", "type": "image" }]
                    }
                }]
            }]
        }));

        let message = event.first_message().unwrap();
        assert_eq!(message.sender_id, "123");
        assert_eq!(message.text, "");
    }

    #[test]
    fn test_absent_segments_mean_no_message() {
        let payloads = [
            json!({}),
            json!({ "entry": [] }),
            json!({ "entry": [{}] }),
            json!({ "entry": [{ "changes": [] }] }),
            json!({ "entry": [{ "changes": [{}] }] }),
            json!({ "entry": [{ "changes": [{ "value": {} }] }] }),
            json!({ "entry": [{ "changes": [{ "value": { "messages": [] } }] }] }),
            // Status updates carry no messages array at all.
            json!({ "entry": [{ "changes": [{ "value": { "statuses": [{ "status": "read" }] } }] }] }),
        ];

        for payload in payloads {
            let event = parse(payload.clone());
            assert_eq!(event.first_message(), None, "payload: {payload}");
        }
    }
}
