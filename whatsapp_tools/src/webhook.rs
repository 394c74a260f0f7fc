//! Inbound webhook payloads.
//!
//! WhatsApp posts notifications wrapped in an envelope:
//!
//! ```text
//! { "object": "whatsapp_business_account",
//!   "entry": [ { "id": "...", "changes": [ { "field": "messages", "value": { "messages": [ ... ] } } ] } ] }
//! ```
//!
//! Status callbacks (sent, delivered, read) arrive through the same endpoint with a `statuses` array and no
//! `messages`. For local testing and simple relays, a single flat message object (`{"from": ..., "text": {...}}`) is
//! accepted as well.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Envelope(WebhookEnvelope),
    Message(WebhookMessage),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub object: Option<String>,
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: Option<String>,
    pub value: WebhookChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookChangeValue {
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
    #[serde(default)]
    pub statuses: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookMessage {
    pub from: String,
    /// The `wamid.` message id. WhatsApp delivers webhooks at least once, so this is the deduplication key.
    #[serde(default)]
    pub id: Option<String>,
    /// Unix time in seconds, as a string.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub button: Option<ButtonBody>,
    #[serde(default)]
    pub interactive: Option<InteractiveBody>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextBody {
    pub body: String,
}

/// A quick-reply button press on a template message.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

/// A reply button press on an interactive message.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractiveBody {
    #[serde(default)]
    pub button_reply: Option<ButtonReply>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonReply {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
}

impl WebhookPayload {
    /// Flattens the payload into the list of customer messages it carries. Status-only callbacks yield nothing.
    pub fn into_messages(self) -> Vec<WebhookMessage> {
        match self {
            WebhookPayload::Message(m) => vec![m],
            WebhookPayload::Envelope(e) => {
                e.entry.into_iter().flat_map(|entry| entry.changes).flat_map(|change| change.value.messages).collect()
            },
        }
    }
}

impl WebhookMessage {
    /// The label of whichever button the customer pressed, if any.
    pub fn button_label(&self) -> Option<&str> {
        let template_button = self.button.as_ref().and_then(|b| b.text.as_deref().or(b.payload.as_deref()));
        template_button
            .or_else(|| self.interactive.as_ref().and_then(|i| i.button_reply.as_ref()).map(|r| r.title.as_str()))
    }

    pub fn text_body(&self) -> Option<&str> {
        self.text.as_ref().map(|t| t.body.as_str())
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_ref().and_then(|ts| ts.parse::<i64>().ok()).and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}
