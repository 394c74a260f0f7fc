use crate::db_types::MealType;

/// Outbound messaging to customers.
///
/// Implementations talk to the messaging provider. Failures are reported, never raised: the workflows decide what a
/// failed send means for the request at hand.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Sends the pre-approved daily menu template to `address`. `items` is the menu as a single line of text.
    ///
    /// Returns `true` if the provider accepted the message.
    async fn send_template(&self, address: &str, meal_type: MealType, items: &str) -> bool;

    /// Sends a free-form text message. Best effort; the outcome is only logged.
    async fn send_freeform(&self, address: &str, message: &str);
}
