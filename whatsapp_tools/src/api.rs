use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};

use crate::{
    config::WhatsappConfig,
    data_objects::{OutgoingMessage, SendMessageResponse, TemplateComponent},
    WhatsappApiError,
};

#[derive(Clone)]
pub struct WhatsappApi {
    config: WhatsappConfig,
    client: Arc<Client>,
}

impl WhatsappApi {
    pub fn new(config: WhatsappConfig) -> Result<Self, WhatsappApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.access_token.reveal());
        let mut val = HeaderValue::from_str(&bearer).map_err(|e| WhatsappApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| WhatsappApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &WhatsappConfig {
        &self.config
    }

    /// Posts a message to the Cloud API. Any non-2xx status is returned as [`WhatsappApiError::QueryError`].
    pub async fn send_message(&self, message: &OutgoingMessage) -> Result<SendMessageResponse, WhatsappApiError> {
        let url = self.config.messages_url();
        trace!("Sending message to {} via {url}", message.to);
        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(|e| WhatsappApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Message request successful. {}", response.status());
            let result = response
                .json::<SendMessageResponse>()
                .await
                .map_err(|e| WhatsappApiError::JsonError(e.to_string()))?;
            if result.message_id().is_none() {
                return Err(WhatsappApiError::EmptyResponse);
            }
            Ok(result)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| WhatsappApiError::RestResponseError(e.to_string()))?;
            Err(WhatsappApiError::QueryError { status, message })
        }
    }

    /// Sends the configured menu template to `to`, filling in the meal type and the list of dishes.
    pub async fn send_menu_template(
        &self,
        to: &str,
        meal_type: &str,
        items: &str,
    ) -> Result<SendMessageResponse, WhatsappApiError> {
        let components = vec![TemplateComponent::body([meal_type, items])];
        let message =
            OutgoingMessage::template(to, &self.config.template_name, &self.config.template_language, components);
        debug!("Sending '{}' template to {to}", self.config.template_name);
        let result = self.send_message(&message).await?;
        info!("Menu template sent to {to} [{}]", result.message_id().unwrap_or_default());
        Ok(result)
    }

    pub async fn send_text(&self, to: &str, body: &str) -> Result<SendMessageResponse, WhatsappApiError> {
        let message = OutgoingMessage::text(to, body);
        let result = self.send_message(&message).await?;
        info!("Text message sent to {to} [{}]", result.message_id().unwrap_or_default());
        Ok(result)
    }
}
