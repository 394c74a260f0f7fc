use log::*;
use meals_common::Secret;

const DEFAULT_API_URL: &str = "https://graph.facebook.com";
const DEFAULT_API_VERSION: &str = "v19.0";
const DEFAULT_TEMPLATE_NAME: &str = "daily_menu";
const DEFAULT_TEMPLATE_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Default)]
pub struct WhatsappConfig {
    /// Base URL of the Graph API. Override it to point the client at a sandbox or a local stub.
    pub api_url: String,
    pub api_version: String,
    /// The id of the business phone number that messages are sent from.
    pub phone_number_id: String,
    pub access_token: Secret<String>,
    /// The pre-approved template used for menu notifications. It takes two body parameters: the meal type and the
    /// comma-separated list of dishes.
    pub template_name: String,
    pub template_language: String,
}

impl WhatsappConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("MEALS_WHATSAPP_API_URL").unwrap_or_else(|_| {
            debug!("MEALS_WHATSAPP_API_URL not set, using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        let api_version = std::env::var("MEALS_WHATSAPP_API_VERSION").unwrap_or_else(|_| {
            info!("MEALS_WHATSAPP_API_VERSION not set, using {DEFAULT_API_VERSION} as default");
            DEFAULT_API_VERSION.to_string()
        });
        let phone_number_id = std::env::var("MEALS_WHATSAPP_PHONE_NUMBER_ID").unwrap_or_else(|_| {
            warn!("MEALS_WHATSAPP_PHONE_NUMBER_ID not set. Outbound messages will fail.");
            String::default()
        });
        let access_token = Secret::new(std::env::var("MEALS_WHATSAPP_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("MEALS_WHATSAPP_ACCESS_TOKEN not set. Outbound messages will fail.");
            String::default()
        }));
        let template_name = std::env::var("MEALS_WHATSAPP_TEMPLATE_NAME").unwrap_or_else(|_| {
            info!("MEALS_WHATSAPP_TEMPLATE_NAME not set, using '{DEFAULT_TEMPLATE_NAME}'");
            DEFAULT_TEMPLATE_NAME.to_string()
        });
        let template_language =
            std::env::var("MEALS_WHATSAPP_TEMPLATE_LANGUAGE").unwrap_or_else(|_| DEFAULT_TEMPLATE_LANGUAGE.to_string());
        Self { api_url, api_version, phone_number_id, access_token, template_name, template_language }
    }

    /// The endpoint that all outbound messages are posted to.
    pub fn messages_url(&self) -> String {
        format!("{}/{}/{}/messages", self.api_url.trim_end_matches('/'), self.api_version, self.phone_number_id)
    }
}
