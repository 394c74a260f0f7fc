mod helpers;
pub mod op;
mod rupees;
mod secret;

pub use helpers::{env_flag, parse_boolean_flag};
pub use rupees::{Rupees, RupeesConversionError, CURRENCY_CODE};
pub use secret::Secret;
