use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Customer, NewCustomer, Order, OrderDetails, OrderStatus},
    helpers::{normalize_whatsapp_number, start_of_day, today},
    order_objects::OrderQueryFilter,
    traits::{CustomerManagement, MealPlanError, OrderManagement},
};

/// `AccountApi` manages customers and gives admins a view over orders.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> AccountApi<B>
where B: CustomerManagement + OrderManagement
{
    /// Registers a customer, or returns the existing customer for the same number.
    ///
    /// Both fields are required and the number must be a valid messaging address. An existing customer keeps their
    /// stored delivery address. Returns `true` in the second field if a new customer was created.
    pub async fn upsert_customer(
        &self,
        whatsapp_number: &str,
        delivery_address: &str,
    ) -> Result<(Customer, bool), MealPlanError> {
        if whatsapp_number.trim().is_empty() || delivery_address.trim().is_empty() {
            return Err(MealPlanError::ValidationError(
                "Both a WhatsApp number and a delivery address are required".into(),
            ));
        }
        let number = normalize_whatsapp_number(whatsapp_number)?;
        register_customer(&self.db, &number, Some(delivery_address)).await
    }

    pub async fn customer_count(&self) -> Result<i64, MealPlanError> {
        self.db.customer_count().await
    }

    /// Orders created since local midnight, newest first.
    pub async fn orders_placed_today(&self) -> Result<Vec<OrderDetails>, MealPlanError> {
        let query = OrderQueryFilter::default().since(start_of_day(today()));
        self.db.search_orders(query).await
    }

    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetails>, MealPlanError> {
        trace!("📦️ Searching orders. {query}");
        self.db.search_orders(query).await
    }

    pub async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, MealPlanError> {
        let order = self.db.update_order_status(order_id, status).await?;
        info!("📦️ Order #{order_id} is now {status}");
        Ok(order)
    }
}

/// Returns the customer registered under the normalized `number`, creating one if needed.
///
/// A delivery address is only needed for new customers. Concurrent registrations of the same number resolve to a
/// single record.
pub(crate) async fn register_customer<B: CustomerManagement>(
    db: &B,
    number: &str,
    delivery_address: Option<&str>,
) -> Result<(Customer, bool), MealPlanError> {
    if let Some(customer) = db.fetch_customer_by_number(number).await? {
        trace!("📦️ Customer #{} found for {number}", customer.id);
        return Ok((customer, false));
    }
    let address = delivery_address.map(str::trim).filter(|a| !a.is_empty()).ok_or_else(|| {
        MealPlanError::ValidationError(format!("{number} is not registered yet. A delivery address is required"))
    })?;
    let (customer, inserted) = db.insert_customer(NewCustomer::new(number, address)).await?;
    if inserted {
        info!("📦️ New customer #{} registered for {number}", customer.id);
    }
    Ok((customer, inserted))
}
