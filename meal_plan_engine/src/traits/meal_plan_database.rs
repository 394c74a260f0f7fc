use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    db_types::MealType,
    traits::{CustomerManagement, DeliveryManagement, InboxManagement, MenuManagement, OrderManagement},
};

/// The full set of storage behaviour a backend must provide to drive the meal subscription workflows.
///
/// This is a marker trait. Any `Clone` type implementing all the management traits gets it for free, which keeps the
/// trait bounds on the server's route handlers short.
pub trait MealPlanDatabase:
    Clone + CustomerManagement + MenuManagement + OrderManagement + DeliveryManagement + InboxManagement
{
}

impl<T> MealPlanDatabase for T where T: Clone
        + CustomerManagement
        + MenuManagement
        + OrderManagement
        + DeliveryManagement
        + InboxManagement
{
}

#[derive(Debug, Clone, Error)]
pub enum MealPlanError {
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("No {meal_type} menu has been published for {date}")]
    MenuNotFound { meal_type: MealType, date: NaiveDate },
    #[error("Customer #{0} does not exist")]
    CustomerNotFound(i64),
    #[error("Order #{0} does not exist")]
    OrderNotFound(i64),
    #[error("Delivery #{0} does not exist")]
    DeliveryNotFound(i64),
    #[error("Payment verification failed. The payment signature does not match.")]
    VerificationError,
    #[error("Could not send a notification to {0}. Nothing was saved, so the request can be retried.")]
    NotificationFailure(String),
    #[error("Cannot change the status of {entity} from {from} to {to}")]
    InvalidTransition { entity: String, from: String, to: String },
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
}

impl MealPlanError {
    /// True when the caller can safely retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MealPlanError::NotificationFailure(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MealPlanError::MenuNotFound { .. }
                | MealPlanError::CustomerNotFound(_)
                | MealPlanError::OrderNotFound(_)
                | MealPlanError::DeliveryNotFound(_)
        )
    }
}

impl From<sqlx::Error> for MealPlanError {
    fn from(e: sqlx::Error) -> Self {
        MealPlanError::DatabaseError(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for MealPlanError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        MealPlanError::DatabaseError(format!("Migration failed. {e}"))
    }
}
