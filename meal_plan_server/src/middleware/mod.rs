mod hmac;

pub use hmac::{HmacMiddlewareFactory, HmacMiddlewareService, WHATSAPP_SIGNATURE_HEADER};
