use actix_web::web;
use hmac::{Hmac, Mac};
use log::{debug, trace};
use sha2::Sha256;

use crate::errors::ServerError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Signs `data` the way WhatsApp signs webhook bodies: `sha256=` followed by the hex-encoded HMAC-SHA256 of the raw
/// body, keyed with the app secret.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(data);
            format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
        },
        Err(e) => {
            debug!("🔐️ Could not create HMAC. {e}");
            String::default()
        },
    }
}

/// Checks an `X-Hub-Signature-256` header value against `data`. The comparison runs in constant time.
pub fn verify_hub_signature(secret: &str, data: &[u8], signature: &str) -> bool {
    let Some(hex_sig) = signature.trim().strip_prefix(SIGNATURE_PREFIX) else {
        trace!("🔐️ Signature header is missing the '{SIGNATURE_PREFIX}' prefix");
        return false;
    };
    let Ok(expected) = hex::decode(hex_sig) else {
        trace!("🔐️ Signature header is not valid hex");
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(data);
    mac.verify_slice(&expected).is_ok()
}

/// Body extraction errors are reported as JSON 400s, like every other error the server returns.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ServerError::InvalidQuery(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ServerError::InvalidRequestPath(err.to_string()).into())
}
