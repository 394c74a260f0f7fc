use meal_plan_engine::{db_types::MealType, order_objects::PaymentProof, Notifier, PaymentVerifier};
use mockall::mock;

mock! {
    pub Messenger {}
    impl Notifier for Messenger {
        async fn send_template(&self, address: &str, meal_type: MealType, items: &str) -> bool;
        async fn send_freeform(&self, address: &str, message: &str);
    }
}

mock! {
    pub Razorpay {}
    impl PaymentVerifier for Razorpay {
        fn verify(&self, proof: &PaymentProof) -> bool;
    }
}

/// A messenger that accepts every message, any number of times.
pub fn accepting_messenger() -> MockMessenger {
    let mut messenger = MockMessenger::new();
    messenger.expect_send_template().returning(|_, _, _| true);
    messenger.expect_send_freeform().returning(|_, _| ());
    messenger
}

/// A messenger whose provider is down.
pub fn failing_messenger() -> MockMessenger {
    let mut messenger = MockMessenger::new();
    messenger.expect_send_template().returning(|_, _, _| false);
    messenger
}

pub fn verifier(accepts: bool) -> MockRazorpay {
    let mut verifier = MockRazorpay::new();
    verifier.expect_verify().returning(move |_| accepts);
    verifier
}
