//! # Payment signature verification
//!
//! When a customer completes a checkout, the payment provider hands the browser three values: the provider's order
//! reference, the payment id, and a signature over both. The browser forwards them to us, so we cannot trust any of
//! them until the signature checks out.
//!
//! ## Signature format
//!
//! The signature is the lowercase hex encoding of
//!
//! ```text
//!    HMAC-SHA256(key_secret, "{order_ref}|{payment_ref}")
//! ```
//!
//! where `key_secret` is the merchant's API key secret, shared only between us and the provider.
//!
//! Comparison happens in constant time. Signatures that are not valid hex, or that have the wrong length, simply fail
//! verification.
use hmac::{Hmac, Mac};
use log::*;
use meals_common::Secret;
use sha2::Sha256;

use crate::{order_objects::PaymentProof, traits::PaymentVerifier};

type HmacSha256 = Hmac<Sha256>;

fn signing_payload(order_ref: &str, payment_ref: &str) -> String {
    format!("{order_ref}|{payment_ref}")
}

/// Produces the hex signature the provider would send for this payment.
pub fn sign_payment(order_ref: &str, payment_ref: &str, secret: &str) -> String {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map(|mut mac| {
            mac.update(signing_payload(order_ref, payment_ref).as_bytes());
            hex::encode(mac.finalize().into_bytes())
        })
        .unwrap_or_default()
}

/// Checks `signature` against the expected HMAC for the order and payment references.
pub fn verify_payment_signature(order_ref: &str, payment_ref: &str, signature: &str, secret: &str) -> bool {
    let Ok(supplied) = hex::decode(signature.trim()) else {
        debug!("🔐️ Payment signature for {order_ref} is not valid hex");
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(signing_payload(order_ref, payment_ref).as_bytes());
    mac.verify_slice(&supplied).is_ok()
}

/// A [`PaymentVerifier`] for Razorpay checkout confirmations.
#[derive(Clone, Debug, Default)]
pub struct RazorpayVerifier {
    key_secret: Secret<String>,
}

impl RazorpayVerifier {
    pub fn new(key_secret: Secret<String>) -> Self {
        Self { key_secret }
    }
}

impl PaymentVerifier for RazorpayVerifier {
    fn verify(&self, proof: &PaymentProof) -> bool {
        if !self.key_secret.is_set() {
            warn!("🔐️ No payment key secret is configured. Rejecting payment {}", proof.payment_ref);
            return false;
        }
        let valid = verify_payment_signature(
            &proof.order_ref,
            &proof.payment_ref,
            &proof.signature,
            self.key_secret.reveal(),
        );
        if valid {
            debug!("🔐️ Payment {} for {} verified", proof.payment_ref, proof.order_ref);
        } else {
            warn!("🔐️ Payment signature mismatch for {} / {}", proof.order_ref, proof.payment_ref);
        }
        valid
    }
}
