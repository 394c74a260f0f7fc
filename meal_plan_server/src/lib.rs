//! # Meal plan server
//! This crate hosts the HTTP server for the meal subscription service. It is responsible for:
//! * The admin API: publishing menus, listing orders and deliveries, and moving them through their lifecycle.
//! * The customer API: registering, placing orders, and confirming Razorpay payments.
//! * Receiving customer replies from the WhatsApp webhook.
//!
//! The business logic lives in [`meal_plan_engine`]. This crate wires it to actix-web, to the WhatsApp Cloud API
//! (see [`integrations::whatsapp`]) and to Razorpay signature checks.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! `/health` is served at the root. Every other route is under `/api/v1`:
//! * `POST /customer/create`, `GET /customer/customersCount`
//! * `POST /menu/add`, `GET /menu/today?menuType=lunch`
//! * `POST /order/createOrder`, `GET /order/today`, `GET /order/allOrders`, `PATCH /order/{id}/status`
//! * `POST /payment/verify`
//! * `GET /delivery/today`, `PATCH /delivery/{id}/status`
//! * `GET|POST /whatsapp/webhook`, `GET /whatsapp/responses`, `POST /whatsapp/send`

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
