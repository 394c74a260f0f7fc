use chrono::{DateTime, Utc};

use crate::{
    db_types::{Delivery, InboundMessage},
    helpers::clean_reply,
};

/// A single customer message, as extracted from a provider webhook.
///
/// A button press and a typed message can both carry the reply. The button label wins when both are present.
#[derive(Debug, Clone, Default)]
pub struct InboundReply {
    pub sender: String,
    pub message_id: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub button_label: Option<String>,
    pub text: Option<String>,
}

impl InboundReply {
    pub fn text<S: Into<String>, T: Into<String>>(sender: S, text: T) -> Self {
        Self { sender: sender.into(), text: Some(text.into()), ..Default::default() }
    }

    pub fn button<S: Into<String>, T: Into<String>>(sender: S, label: T) -> Self {
        Self { sender: sender.into(), button_label: Some(label.into()), ..Default::default() }
    }

    pub fn with_message_id<S: Into<String>>(mut self, message_id: S) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = Some(received_at);
        self
    }

    /// The trimmed reply text, or `None` if the message carried neither a button label nor any text.
    pub fn reply(&self) -> Option<String> {
        clean_reply(self.button_label.as_deref()).or_else(|| clean_reply(self.text.as_deref()))
    }
}

/// What happened to an inbound reply. The webhook acknowledges every outcome the same way; this is for logs and tests.
#[derive(Debug, Clone)]
pub enum ReplyOutcome {
    /// Nothing usable in the message. Nothing was stored.
    Ignored,
    /// The provider redelivered a message we have already logged.
    Duplicate,
    /// Logged, but not a confirmation.
    Logged(InboundMessage),
    /// A confirmation from an address with no customer record.
    UnknownCustomer(InboundMessage),
    /// A confirmation from a customer with no active order.
    NoActiveOrder(InboundMessage),
    /// A confirmation against an order with no meals left to debit.
    NoMealsLeft(InboundMessage),
    /// A meal was debited and a delivery was scheduled.
    DeliveryScheduled { message: InboundMessage, delivery: Delivery, meals_remaining: i64 },
    /// Processing stopped on an internal error.
    Failed(String),
}

impl ReplyOutcome {
    pub fn is_delivery_scheduled(&self) -> bool {
        matches!(self, ReplyOutcome::DeliveryScheduled { .. })
    }
}
