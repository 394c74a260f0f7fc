use serde::Serialize;

use crate::db_types::Menu;

/// The outcome of publishing a menu.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedMenu {
    pub menu: Menu,
    /// Customers the provider accepted a notification for.
    pub notified_count: usize,
    /// Distinct customers that were eligible for this meal slot.
    pub total_eligible: usize,
}
