use crate::{
    db_types::{Customer, MealType, NewOrder, Order, OrderDetails, OrderStatus},
    order_objects::OrderQueryFilter,
    traits::MealPlanError,
};

#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, MealPlanError>;

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, MealPlanError>;

    /// Customers holding at least one active order with meals remaining whose split covers `meal_type`.
    ///
    /// Each customer appears once, no matter how many qualifying orders they hold.
    async fn fetch_eligible_customers(&self, meal_type: MealType) -> Result<Vec<Customer>, MealPlanError>;

    /// The most recently created active order for the customer. Ties on creation time go to the higher id.
    async fn fetch_latest_active_order(&self, customer_id: i64) -> Result<Option<Order>, MealPlanError>;

    /// Orders matching the filter, newest first, with their customers and delivery history attached.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetails>, MealPlanError>;

    /// Moves the order to `status`.
    ///
    /// Returns [`MealPlanError::InvalidTransition`] if the current status does not allow the change.
    async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, MealPlanError>;
}
