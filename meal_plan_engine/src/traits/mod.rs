//! # Storage and integration contracts
//!
//! This module defines the interfaces that storage backends and outbound integrations must implement in order to
//! drive the meal subscription workflows.
//!
//! ## Storage
//! * [`CustomerManagement`] stores customers, keyed by their messaging address.
//! * [`MenuManagement`] stores the append-only history of published menus.
//! * [`OrderManagement`] stores orders and their prepaid meal balances.
//! * [`DeliveryManagement`] records confirmed deliveries and debits meal balances atomically.
//! * [`InboxManagement`] keeps the log of inbound customer messages.
//!
//! [`MealPlanDatabase`] bundles all of the above.
//!
//! ## Integrations
//! * [`Notifier`] sends messages to customers.
//! * [`PaymentVerifier`] checks payment signatures.
mod customer_management;
mod delivery_management;
mod inbox_management;
mod meal_plan_database;
mod menu_management;
mod notifier;
mod order_management;
mod payment_verifier;

pub use customer_management::CustomerManagement;
pub use delivery_management::DeliveryManagement;
pub use inbox_management::InboxManagement;
pub use meal_plan_database::{MealPlanDatabase, MealPlanError};
pub use menu_management::MenuManagement;
pub use notifier::Notifier;
pub use order_management::OrderManagement;
pub use payment_verifier::PaymentVerifier;
