//! Webhook signature middleware for Actix Web.
//!
//! WhatsApp signs every webhook body with the Meta app secret and sends the signature in the `X-Hub-Signature-256`
//! header, formatted as `sha256=<hex digest>`. Wrap the webhook scope with [`HmacMiddlewareFactory`] to reject
//! requests that were not signed with our app secret.
//!
//! The middleware has to read the whole body to check it, so it puts the bytes back into the request afterwards for
//! the handler to consume.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use meals_common::Secret;

use crate::{errors::ServerError, helpers::verify_hub_signature};

pub const WHATSAPP_SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

pub struct HmacMiddlewareFactory {
    hmac_header: String,
    key: Secret<String>,
    // If false, then the middleware will not check the signature and always allow the call
    enabled: bool,
}

impl HmacMiddlewareFactory {
    pub fn new(hmac_header: &str, key: Secret<String>, enabled: bool) -> Self {
        HmacMiddlewareFactory { hmac_header: hmac_header.into(), key, enabled }
    }

    pub fn whatsapp(key: Secret<String>, enabled: bool) -> Self {
        Self::new(WHATSAPP_SIGNATURE_HEADER, key, enabled)
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService {
            hmac_header: self.hmac_header.clone(),
            key: self.key.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct HmacMiddlewareService<S> {
    hmac_header: String,
    key: Secret<String>,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        if !self.enabled {
            trace!("🔐️ Webhook signature checks are disabled. Allowing request.");
            return Box::pin(async move { service.call(req).await });
        }
        let secret = self.key.clone();
        let header = self.hmac_header.clone();
        Box::pin(async move {
            let body = signed_body(&mut req, &header, &secret).await?;
            req.set_payload(bytes_to_payload(body));
            service.call(req).await
        })
    }
}

/// Reads the request body and returns it if the signature in `header` matches it.
async fn signed_body(
    req: &mut ServiceRequest,
    header: &str,
    secret: &Secret<String>,
) -> Result<web::Bytes, ServerError> {
    if !secret.is_set() {
        warn!("🔐️ No app secret is configured, so the webhook signature cannot be checked. Denying access.");
        return Err(ServerError::Forbidden("Webhook signatures cannot be verified.".into()));
    }
    let body = req.extract::<web::Bytes>().await.map_err(|e| {
        warn!("🔐️ Failed to extract request data: {e:?}");
        ServerError::InvalidRequestBody("Failed to extract request data.".into())
    })?;
    let Some(signature) = req.headers().get(header).and_then(|v| v.to_str().ok()) else {
        warn!("🔐️ No {header} signature found in request. Denying access.");
        return Err(ServerError::Forbidden("No webhook signature found.".into()));
    };
    if !verify_hub_signature(secret.reveal(), &body, signature) {
        warn!("🔐️ Invalid webhook signature from {:?}. Denying access.", req.peer_addr());
        return Err(ServerError::Forbidden("Invalid webhook signature.".into()));
    }
    trace!("🔐️ Webhook signature check ✅️");
    Ok(body)
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
