use chrono::NaiveDate;

use crate::{
    db_types::{MealType, Menu, NewMenu},
    traits::MealPlanError,
};

#[allow(async_fn_in_trait)]
pub trait MenuManagement {
    /// Stores a published menu. Menus are append-only, so publishing twice for the same slot keeps both rows.
    async fn insert_menu(&self, menu: NewMenu) -> Result<Menu, MealPlanError>;

    /// The most recently published menu for the given date and slot, if any.
    async fn fetch_latest_menu(&self, date: NaiveDate, meal_type: MealType) -> Result<Option<Menu>, MealPlanError>;
}
