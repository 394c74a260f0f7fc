//! Helpers for tests in this crate and in crates that build on it. Enable the `test_utils` feature to use them from
//! outside the crate.
pub mod fakes;
pub mod prepare_env;
