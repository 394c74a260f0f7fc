//! # WhatsApp tools
//!
//! A thin client for the WhatsApp Cloud API (Meta Graph API), covering the two outbound calls the meal service needs:
//! template messages (the daily menu) and freeform text messages. The [`webhook`] module holds the inbound payload
//! types that WhatsApp posts to our webhook.
mod api;
mod config;
mod data_objects;
mod error;
pub mod webhook;

pub use api::WhatsappApi;
pub use config::WhatsappConfig;
pub use data_objects::{MessageContact, MessageId, OutgoingMessage, SendMessageResponse, TemplateComponent};
pub use error::WhatsappApiError;
pub use webhook::{WebhookMessage, WebhookPayload};
