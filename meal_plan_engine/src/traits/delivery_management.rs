use chrono::NaiveDate;

use crate::{
    db_types::{Delivery, DeliveryDetails, DeliveryStatus, NewDelivery, Order},
    traits::MealPlanError,
};

#[allow(async_fn_in_trait)]
pub trait DeliveryManagement {
    /// Debits one meal from the order and records the delivery, in a single atomic transaction.
    ///
    /// The debit only happens if the order is still active with at least one meal left at the moment of the write, so
    /// concurrent confirmations can never push the balance below zero. When the last meal is debited, the order is
    /// marked as completed.
    ///
    /// Returns the new delivery and the updated order, or `None` if there was no meal left to debit. In that case
    /// nothing is written.
    async fn confirm_delivery(&self, delivery: NewDelivery) -> Result<Option<(Delivery, Order)>, MealPlanError>;

    async fn fetch_delivery(&self, id: i64) -> Result<Option<Delivery>, MealPlanError>;

    async fn fetch_deliveries_for_order(&self, order_id: i64) -> Result<Vec<Delivery>, MealPlanError>;

    /// All deliveries scheduled for `date`, newest first, with the order and customer they belong to.
    async fn fetch_deliveries_for_date(&self, date: NaiveDate) -> Result<Vec<DeliveryDetails>, MealPlanError>;

    /// Moves the delivery to `status`, stamping `delivered_at` when it arrives.
    ///
    /// Returns [`MealPlanError::InvalidTransition`] for backwards moves, or any move out of a terminal state.
    async fn update_delivery_status(&self, id: i64, status: DeliveryStatus) -> Result<Delivery, MealPlanError>;
}
