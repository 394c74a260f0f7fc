//! # Meal plan engine public API
//!
//! The `mpe_api` module exposes the programmatic API for the meal subscription service. The API is split by
//! workflow, so that clients only need the backend capabilities (and integrations) a workflow actually uses.
//!
//! * [`accounts_api`] registers customers and gives admins a view over orders.
//! * [`menu_api`] publishes daily menus and broadcasts them to subscribers.
//! * [`order_flow_api`] places new orders, verifying payments and welcoming customers with today's menu.
//! * [`reply_api`] turns customer replies into scheduled deliveries.
//! * [`delivery_api`] tracks deliveries through to the customer's door.
//!
//! The other submodules in this module are support types.
//!
//! # API usage
//!
//! Every API is created by supplying a database backend that implements the backend traits the API needs, plus any
//! integrations it talks to:
//!
//! ```rust,ignore
//! use meal_plan_engine::{GatingPolicy, MenuApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = MenuApi::new(db, my_notifier, GatingPolicy::Strict);
//! let published = api.publish_menu(menu).await?;
//! ```

pub mod accounts_api;
pub mod delivery_api;
pub mod gating;
pub mod menu_api;
pub mod menu_objects;
pub mod order_flow_api;
pub mod order_objects;
pub mod reply_api;
pub mod reply_objects;
