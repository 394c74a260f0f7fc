//! `SqliteDatabase` is a concrete implementation of a meal plan engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::NaiveDate;
use log::*;
use sqlx::{SqliteConnection, SqlitePool};

use super::db::{customers, db_url, deliveries, inbox, menus, new_pool, orders};
use crate::{
    db_types::{
        Customer,
        Delivery,
        DeliveryDetails,
        DeliveryStatus,
        InboundMessage,
        MealType,
        Menu,
        NewCustomer,
        NewDelivery,
        NewInboundMessage,
        NewMenu,
        NewOrder,
        Order,
        OrderDetails,
        OrderStatus,
    },
    order_objects::OrderQueryFilter,
    traits::{
        CustomerManagement,
        DeliveryManagement,
        InboxManagement,
        MealPlanError,
        MenuManagement,
        OrderManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `MEALS_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, MealPlanError> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, MealPlanError> {
        let pool = new_pool(url, max_connections).await?;
        trace!("🗃️ Connection pool created for {url} with {max_connections} connections");
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), MealPlanError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), MealPlanError> {
        self.pool.close().await;
        Ok(())
    }
}

async fn order_details(order: Order, conn: &mut SqliteConnection) -> Result<OrderDetails, MealPlanError> {
    let customer = customers::fetch_customer(order.customer_id, &mut *conn)
        .await?
        .ok_or(MealPlanError::CustomerNotFound(order.customer_id))?;
    let deliveries = deliveries::fetch_deliveries_for_order(order.id, conn).await?;
    Ok(OrderDetails { order, customer, deliveries })
}

impl CustomerManagement for SqliteDatabase {
    async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(customers::fetch_customer(id, &mut conn).await?)
    }

    async fn fetch_customer_by_number(&self, whatsapp_number: &str) -> Result<Option<Customer>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(customers::fetch_customer_by_number(whatsapp_number, &mut conn).await?)
    }

    async fn insert_customer(&self, customer: NewCustomer) -> Result<(Customer, bool), MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(customers::idempotent_insert(customer, &mut conn).await?)
    }

    async fn customer_count(&self) -> Result<i64, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(customers::customer_count(&mut conn).await?)
    }
}

impl MenuManagement for SqliteDatabase {
    async fn insert_menu(&self, menu: NewMenu) -> Result<Menu, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(menus::insert_menu(menu, &mut conn).await?)
    }

    async fn fetch_latest_menu(&self, date: NaiveDate, meal_type: MealType) -> Result<Option<Menu>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(menus::fetch_latest_menu(date, meal_type, &mut conn).await?)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::insert_order(order, &mut conn).await?)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order(id, &mut conn).await?)
    }

    async fn fetch_eligible_customers(&self, meal_type: MealType) -> Result<Vec<Customer>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        let customers = orders::fetch_eligible_customers(meal_type, &mut conn).await?;
        trace!("🗃️ {} customers are eligible for {meal_type}", customers.len());
        Ok(customers)
    }

    async fn fetch_latest_active_order(&self, customer_id: i64) -> Result<Option<Order>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_latest_active_order(customer_id, &mut conn).await?)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetails>, MealPlanError> {
        let mut tx = self.pool.begin().await?;
        let found = orders::search_orders(query, &mut tx).await?;
        let mut result = Vec::with_capacity(found.len());
        for order in found {
            result.push(order_details(order, &mut tx).await?);
        }
        tx.commit().await?;
        Ok(result)
    }

    async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, MealPlanError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::fetch_order(id, &mut tx).await?.ok_or(MealPlanError::OrderNotFound(id))?;
        if !order.order_status.can_transition_to(status) {
            return Err(MealPlanError::InvalidTransition {
                entity: format!("order #{id}"),
                from: order.order_status.to_string(),
                to: status.to_string(),
            });
        }
        let order = orders::update_order_status(id, status, &mut tx).await?.ok_or(MealPlanError::OrderNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ Order #{id} status updated to {status}");
        Ok(order)
    }
}

impl DeliveryManagement for SqliteDatabase {
    async fn confirm_delivery(&self, delivery: NewDelivery) -> Result<Option<(Delivery, Order)>, MealPlanError> {
        let mut tx = self.pool.begin().await?;
        let order_id = delivery.order_id;
        let Some(order) = orders::debit_meal(order_id, &mut tx).await? else {
            debug!("🗃️ Order #{order_id} has no meals left to debit");
            return Ok(None);
        };
        let delivery = deliveries::insert_delivery(delivery, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ One meal debited from order #{order_id}. {} left", order.meal_quantity);
        Ok(Some((delivery, order)))
    }

    async fn fetch_delivery(&self, id: i64) -> Result<Option<Delivery>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deliveries::fetch_delivery(id, &mut conn).await?)
    }

    async fn fetch_deliveries_for_order(&self, order_id: i64) -> Result<Vec<Delivery>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deliveries::fetch_deliveries_for_order(order_id, &mut conn).await?)
    }

    async fn fetch_deliveries_for_date(&self, date: NaiveDate) -> Result<Vec<DeliveryDetails>, MealPlanError> {
        let mut tx = self.pool.begin().await?;
        let found = deliveries::fetch_deliveries_for_date(date, &mut tx).await?;
        let mut result = Vec::with_capacity(found.len());
        for delivery in found {
            let order = orders::fetch_order(delivery.order_id, &mut tx)
                .await?
                .ok_or(MealPlanError::OrderNotFound(delivery.order_id))?;
            let customer = customers::fetch_customer(order.customer_id, &mut tx)
                .await?
                .ok_or(MealPlanError::CustomerNotFound(order.customer_id))?;
            result.push(DeliveryDetails { delivery, order, customer });
        }
        tx.commit().await?;
        Ok(result)
    }

    async fn update_delivery_status(&self, id: i64, status: DeliveryStatus) -> Result<Delivery, MealPlanError> {
        let mut tx = self.pool.begin().await?;
        let delivery = deliveries::fetch_delivery(id, &mut tx).await?.ok_or(MealPlanError::DeliveryNotFound(id))?;
        if !delivery.delivery_status.can_transition_to(status) {
            return Err(MealPlanError::InvalidTransition {
                entity: format!("delivery #{id}"),
                from: delivery.delivery_status.to_string(),
                to: status.to_string(),
            });
        }
        let delivery = deliveries::update_delivery_status(id, status, &mut tx)
            .await?
            .ok_or(MealPlanError::DeliveryNotFound(id))?;
        tx.commit().await?;
        Ok(delivery)
    }
}

impl InboxManagement for SqliteDatabase {
    async fn insert_inbound_message(
        &self,
        message: NewInboundMessage,
    ) -> Result<Option<InboundMessage>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(inbox::insert_message(message, &mut conn).await?)
    }

    async fn fetch_inbound_messages(&self, limit: i64) -> Result<Vec<InboundMessage>, MealPlanError> {
        let mut conn = self.pool.acquire().await?;
        Ok(inbox::fetch_messages(limit, &mut conn).await?)
    }
}
