use std::fmt::Debug;

use chrono::NaiveDate;
use log::*;

use crate::{
    db_types::{Delivery, DeliveryDetails, DeliveryStatus},
    helpers::today,
    traits::{DeliveryManagement, MealPlanError},
};

/// `DeliveryApi` gives the kitchen and delivery staff a view of the day's deliveries and lets them move each one
/// along.
pub struct DeliveryApi<B> {
    db: B,
}

impl<B: Debug> Debug for DeliveryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DeliveryApi ({:?})", self.db)
    }
}

impl<B> DeliveryApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> DeliveryApi<B>
where B: DeliveryManagement
{
    pub async fn todays_deliveries(&self) -> Result<Vec<DeliveryDetails>, MealPlanError> {
        self.deliveries_for(today()).await
    }

    pub async fn deliveries_for(&self, date: NaiveDate) -> Result<Vec<DeliveryDetails>, MealPlanError> {
        self.db.fetch_deliveries_for_date(date).await
    }

    pub async fn deliveries_for_order(&self, order_id: i64) -> Result<Vec<Delivery>, MealPlanError> {
        self.db.fetch_deliveries_for_order(order_id).await
    }

    /// Moves a delivery to a new status. Delivered and cancelled deliveries are final.
    pub async fn update_delivery_status(&self, id: i64, status: DeliveryStatus) -> Result<Delivery, MealPlanError> {
        let delivery = self.db.update_delivery_status(id, status).await?;
        info!("🚚️ Delivery #{id} is now {status}");
        Ok(delivery)
    }
}
