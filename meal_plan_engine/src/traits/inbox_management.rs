use crate::{
    db_types::{InboundMessage, NewInboundMessage},
    traits::MealPlanError,
};

#[allow(async_fn_in_trait)]
pub trait InboxManagement {
    /// Appends a message to the inbound log.
    ///
    /// If the message carries a provider message id that has already been logged, nothing is stored and `None` is
    /// returned. Messages without an id are always stored.
    async fn insert_inbound_message(
        &self,
        message: NewInboundMessage,
    ) -> Result<Option<InboundMessage>, MealPlanError>;

    /// Most recent messages first.
    async fn fetch_inbound_messages(&self, limit: i64) -> Result<Vec<InboundMessage>, MealPlanError>;
}
