use crate::{
    db_types::{Customer, NewCustomer},
    traits::MealPlanError,
};

/// Storage behaviour for customer records.
///
/// Customers are keyed by their normalized messaging address. Implementations must never create two customers with the
/// same address, even when two requests race to register the same number.
#[allow(async_fn_in_trait)]
pub trait CustomerManagement {
    async fn fetch_customer(&self, id: i64) -> Result<Option<Customer>, MealPlanError>;

    /// Looks up a customer by their (already normalized) messaging address.
    async fn fetch_customer_by_number(&self, whatsapp_number: &str) -> Result<Option<Customer>, MealPlanError>;

    /// Inserts the customer if no customer with the same address exists.
    ///
    /// Returns the stored customer, and `true` if a new record was created. An existing customer is returned untouched.
    async fn insert_customer(&self, customer: NewCustomer) -> Result<(Customer, bool), MealPlanError>;

    async fn customer_count(&self) -> Result<i64, MealPlanError>;
}
