use serde::{Deserialize, Serialize};

const MESSAGING_PRODUCT: &str = "whatsapp";

//--------------------------------------   OutgoingMessage   ---------------------------------------------------------
/// The body of a `POST /{phone_number_id}/messages` call.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    messaging_product: &'static str,
    recipient_type: &'static str,
    pub to: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: TextContent },
    Template { template: TemplateContent },
}

#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    pub preview_url: bool,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateContent {
    pub name: String,
    pub language: TemplateLanguage,
    pub components: Vec<TemplateComponent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateLanguage {
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub kind: String,
    pub parameters: Vec<TemplateParameter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateParameter {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TemplateComponent {
    /// A `body` component filling the template placeholders `{{1}}`, `{{2}}`, ... in order.
    pub fn body<S: Into<String>>(params: impl IntoIterator<Item = S>) -> Self {
        let parameters =
            params.into_iter().map(|p| TemplateParameter { kind: "text".into(), text: p.into() }).collect();
        Self { kind: "body".into(), parameters }
    }
}

impl OutgoingMessage {
    pub fn text(to: &str, body: &str) -> Self {
        let content = MessageContent::Text { text: TextContent { preview_url: false, body: body.to_string() } };
        Self::new(to, content)
    }

    pub fn template(to: &str, name: &str, language: &str, components: Vec<TemplateComponent>) -> Self {
        let template = TemplateContent {
            name: name.to_string(),
            language: TemplateLanguage { code: language.to_string() },
            components,
        };
        Self::new(to, MessageContent::Template { template })
    }

    fn new(to: &str, content: MessageContent) -> Self {
        Self { messaging_product: MESSAGING_PRODUCT, recipient_type: "individual", to: to.to_string(), content }
    }
}

//--------------------------------------  SendMessageResponse  -------------------------------------------------------
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub messaging_product: Option<String>,
    #[serde(default)]
    pub contacts: Vec<MessageContact>,
    #[serde(default)]
    pub messages: Vec<MessageId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageContact {
    pub input: String,
    pub wa_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageId {
    pub id: String,
}

impl SendMessageResponse {
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}
