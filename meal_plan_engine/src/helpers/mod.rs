mod dates;
mod payment_signature;
mod replies;
mod whatsapp_number;

pub use dates::{start_of_day, today};
pub use payment_signature::{sign_payment, verify_payment_signature, RazorpayVerifier};
pub use replies::{clean_reply, is_affirmative, CONFIRMED_RESPONSE};
pub use whatsapp_number::normalize_whatsapp_number;
