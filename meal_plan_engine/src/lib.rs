//! Meal Plan Engine
//!
//! The Meal Plan Engine runs a prepaid meal subscription service. Customers buy a bundle of meals, receive the day's
//! menu over WhatsApp, and reply "yes" to have a meal delivered. Each confirmation debits one meal from their plan.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`mod@traits`] and [`mod@sqlite`]). The traits define what a backend must provide; SQLite is the
//!    supported backend. The data types stored in the database are defined in the [`mod@db_types`] module and are
//!    public.
//! 2. The workflow APIs ([`MenuApi`], [`OrderFlowApi`], [`ReplyApi`], [`AccountApi`] and [`DeliveryApi`]). These
//!    are generic over the backend and over the outbound integrations ([`Notifier`], [`PaymentVerifier`]), so the
//!    server can plug in real providers and tests can plug in fakes.
pub mod db_types;
pub mod helpers;
mod mpe_api;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use mpe_api::{
    accounts_api::AccountApi,
    delivery_api::DeliveryApi,
    gating,
    gating::GatingPolicy,
    menu_api::MenuApi,
    menu_objects,
    order_flow_api::OrderFlowApi,
    order_objects,
    reply_api::ReplyApi,
    reply_objects,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    CustomerManagement,
    DeliveryManagement,
    InboxManagement,
    MealPlanDatabase,
    MealPlanError,
    MenuManagement,
    Notifier,
    OrderManagement,
    PaymentVerifier,
};
