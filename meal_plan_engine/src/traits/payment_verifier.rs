use crate::order_objects::PaymentProof;

/// Checks that a payment confirmation really came from the payment provider.
pub trait PaymentVerifier {
    fn verify(&self, proof: &PaymentProof) -> bool;
}
