//! SQLite database module for the Meal Plan Engine.
//!
//! Migrations live in `migrations/` and are embedded at compile time. See [`SqliteDatabase::run_migrations`].
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
