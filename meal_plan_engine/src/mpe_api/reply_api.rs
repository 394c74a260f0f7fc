use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db_types::{InboundMessage, NewDelivery, NewInboundMessage},
    helpers::{is_affirmative, normalize_whatsapp_number, today, CONFIRMED_RESPONSE},
    reply_objects::{InboundReply, ReplyOutcome},
    traits::{CustomerManagement, DeliveryManagement, InboxManagement, MealPlanError, OrderManagement},
};

pub const DEFAULT_INBOX_LIMIT: i64 = 100;

/// `ReplyApi` processes customer replies to the daily menu message.
///
/// Every reply is logged. A "yes" from a customer with an active order debits one meal and schedules a delivery for
/// today.
pub struct ReplyApi<B> {
    db: B,
}

impl<B: Debug> Debug for ReplyApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReplyApi ({:?})", self.db)
    }
}

impl<B> ReplyApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> ReplyApi<B>
where B: CustomerManagement + OrderManagement + DeliveryManagement + InboxManagement
{
    /// Handles one inbound reply. This never fails: problems are logged and reported in the outcome, because the
    /// provider must always get an acknowledgement.
    pub async fn handle_inbound_reply(&self, reply: InboundReply) -> ReplyOutcome {
        match self.process_reply(reply).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("💬️ Could not process an inbound reply. {e}");
                ReplyOutcome::Failed(e.to_string())
            },
        }
    }

    /// The inbound message log, newest first.
    pub async fn inbound_messages(&self, limit: Option<i64>) -> Result<Vec<InboundMessage>, MealPlanError> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_INBOX_LIMIT);
        self.db.fetch_inbound_messages(limit).await
    }

    async fn process_reply(&self, reply: InboundReply) -> Result<ReplyOutcome, MealPlanError> {
        let Some(text) = reply.reply() else {
            trace!("💬️ Message from {} has no text or button reply. Ignoring it", reply.sender);
            return Ok(ReplyOutcome::Ignored);
        };
        // Unparseable senders are still logged, verbatim.
        let sender = normalize_whatsapp_number(&reply.sender).unwrap_or_else(|_| reply.sender.trim().to_string());
        let new_message = NewInboundMessage {
            message_id: reply.message_id.clone(),
            sender: sender.clone(),
            message: text.clone(),
            received_at: reply.received_at.unwrap_or_else(Utc::now),
        };
        let Some(message) = self.db.insert_inbound_message(new_message).await? else {
            debug!("💬️ Message {:?} from {sender} was already processed", reply.message_id);
            return Ok(ReplyOutcome::Duplicate);
        };
        debug!("💬️ Logged message #{} from {sender}: {text}", message.id);
        if !is_affirmative(&text) {
            return Ok(ReplyOutcome::Logged(message));
        }
        let Some(customer) = self.db.fetch_customer_by_number(&sender).await? else {
            info!("💬️ {sender} confirmed a meal but is not a registered customer");
            return Ok(ReplyOutcome::UnknownCustomer(message));
        };
        let Some(order) = self.db.fetch_latest_active_order(customer.id).await? else {
            info!("💬️ Customer #{} confirmed a meal but has no active order", customer.id);
            return Ok(ReplyOutcome::NoActiveOrder(message));
        };
        if order.meal_quantity <= 0 {
            info!("💬️ Customer #{} confirmed a meal but order #{} has no meals left", customer.id, order.id);
            return Ok(ReplyOutcome::NoMealsLeft(message));
        }
        let delivery = NewDelivery::new(&order, today(), CONFIRMED_RESPONSE);
        match self.db.confirm_delivery(delivery).await? {
            Some((delivery, order)) => {
                info!(
                    "💬️ Delivery #{} scheduled for customer #{}. Order #{} has {} meals left",
                    delivery.id, customer.id, order.id, order.meal_quantity
                );
                Ok(ReplyOutcome::DeliveryScheduled { message, delivery, meals_remaining: order.meal_quantity })
            },
            None => {
                info!("💬️ Order #{} ran out of meals before the delivery could be scheduled", order.id);
                Ok(ReplyOutcome::NoMealsLeft(message))
            },
        }
    }
}
