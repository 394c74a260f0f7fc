use std::fmt::Debug;

use log::*;
use meal_plan_engine::{db_types::MealType, reply_objects::InboundReply, Notifier};
use whatsapp_tools::{WebhookMessage, WebhookPayload, WhatsappApi};

/// Sends customer notifications through the WhatsApp Cloud API.
#[derive(Clone)]
pub struct WhatsappNotifier {
    api: WhatsappApi,
}

impl Debug for WhatsappNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WhatsappNotifier ({})", self.api.config().phone_number_id)
    }
}

impl WhatsappNotifier {
    pub fn new(api: WhatsappApi) -> Self {
        Self { api }
    }
}

impl Notifier for WhatsappNotifier {
    async fn send_template(&self, address: &str, meal_type: MealType, items: &str) -> bool {
        match self.api.send_menu_template(address, &meal_type.to_string(), items).await {
            Ok(_) => true,
            Err(e) => {
                warn!("📲️ Could not send the {meal_type} menu to {address}. {e}");
                false
            },
        }
    }

    async fn send_freeform(&self, address: &str, message: &str) {
        if let Err(e) = self.api.send_text(address, message).await {
            warn!("📲️ Could not send a message to {address}. {e}");
        }
    }
}

/// Converts a webhook message into the engine's reply type.
pub fn inbound_reply(message: WebhookMessage) -> InboundReply {
    let received_at = message.sent_at();
    let button_label = message.button_label().map(String::from);
    let text = message.text_body().map(String::from);
    InboundReply { sender: message.from, message_id: message.id, received_at, button_label, text }
}

/// Every customer reply carried by a webhook payload. Status callbacks carry none.
pub fn replies_from_payload(payload: WebhookPayload) -> Vec<InboundReply> {
    payload.into_messages().into_iter().map(inbound_reply).collect()
}
