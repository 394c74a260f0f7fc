use std::env;

use log::*;
use meal_plan_engine::GatingPolicy;
use meals_common::{env_flag, Secret};
use whatsapp_tools::WhatsappConfig;

const DEFAULT_MEALS_HOST: &str = "127.0.0.1";
const DEFAULT_MEALS_PORT: u16 = 4010;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/meals.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// If true, the embedded database migrations are run when the server starts.
    pub auto_migrate: bool,
    /// Whether a failed customer notification abandons the menu or order that triggered it.
    pub gating_policy: GatingPolicy,
    /// The Razorpay key secret. Payment confirmations are signed with it.
    pub razorpay_key_secret: Secret<String>,
    pub whatsapp: WhatsappConfig,
    pub webhook: WebhookConfig,
}

/// Settings for the inbound WhatsApp webhook.
#[derive(Clone, Debug, Default)]
pub struct WebhookConfig {
    /// The Meta app secret. WhatsApp signs every webhook body with it and sends the result in `X-Hub-Signature-256`.
    pub app_secret: Secret<String>,
    /// If false, webhook signatures are not checked at all. **DANGER**
    pub signature_checks: bool,
    /// The token Meta echoes back during the webhook subscription handshake.
    pub verify_token: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MEALS_HOST.to_string(),
            port: DEFAULT_MEALS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            auto_migrate: true,
            gating_policy: GatingPolicy::default(),
            razorpay_key_secret: Secret::default(),
            whatsapp: WhatsappConfig::default(),
            webhook: WebhookConfig { signature_checks: true, ..Default::default() },
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MEALS_HOST").ok().unwrap_or_else(|| DEFAULT_MEALS_HOST.into());
        let port = env::var("MEALS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MEALS_PORT. {e} Using the default, {DEFAULT_MEALS_PORT}, \
                         instead."
                    );
                    DEFAULT_MEALS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MEALS_PORT);
        let database_url = env::var("MEALS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ MEALS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let db_max_connections = env::var("MEALS_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for MEALS_DB_MAX_CONNECTIONS. {e}"))
                    .ok()
            })
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let auto_migrate = env_flag("MEALS_AUTO_MIGRATE", true);
        let gating_policy = env::var("MEALS_GATING_POLICY")
            .map_err(|_| info!("🪛️ MEALS_GATING_POLICY is not set. Using the default, {}", GatingPolicy::default()))
            .and_then(|s| {
                s.parse::<GatingPolicy>().map_err(|e| {
                    warn!("🪛️ {e}. MEALS_GATING_POLICY must be 'strict' or 'lenient'. Using the default instead.")
                })
            })
            .unwrap_or_default();
        let razorpay_key_secret = env::var("MEALS_RAZORPAY_KEY_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ MEALS_RAZORPAY_KEY_SECRET is not set. Payment confirmations will be rejected until it is \
                 configured."
            );
            String::default()
        });
        let whatsapp = WhatsappConfig::new_from_env_or_default();
        let webhook = WebhookConfig::from_env_or_default();
        Self {
            host,
            port,
            database_url,
            db_max_connections,
            auto_migrate,
            gating_policy,
            razorpay_key_secret: Secret::new(razorpay_key_secret),
            whatsapp,
            webhook,
        }
    }
}

impl WebhookConfig {
    pub fn from_env_or_default() -> Self {
        let app_secret = Secret::new(env::var("MEALS_WHATSAPP_APP_SECRET").ok().unwrap_or_default());
        let signature_checks = env_flag("MEALS_WHATSAPP_SIGNATURE_CHECKS", true);
        match (signature_checks, app_secret.is_set()) {
            (true, false) => error!(
                "🪛️ MEALS_WHATSAPP_APP_SECRET is not set, but webhook signature checks are on. Every inbound webhook \
                 call will be rejected."
            ),
            (false, _) => warn!(
                "🚨️ Webhook signature checks are disabled. Anyone can post replies to the webhook. Do not run \
                 production like this."
            ),
            (true, true) => info!("🪛️ Webhook signature checks are enabled"),
        }
        let verify_token = Secret::new(env::var("MEALS_WHATSAPP_VERIFY_TOKEN").ok().unwrap_or_else(|| {
            info!("🪛️ MEALS_WHATSAPP_VERIFY_TOKEN is not set. The webhook subscription handshake will be refused.");
            String::default()
        }));
        Self { app_secret, signature_checks, verify_token }
    }

    /// True when `token` matches the configured verification token. An unset token never matches.
    pub fn accepts_verify_token(&self, token: &str) -> bool {
        self.verify_token.is_set() && self.verify_token.reveal() == token
    }
}
