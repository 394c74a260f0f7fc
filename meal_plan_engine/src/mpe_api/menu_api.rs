use std::fmt::Debug;

use chrono::NaiveDate;
use log::*;

use crate::{
    db_types::{MealType, Menu, NewMenu},
    gating::GatingPolicy,
    helpers::today,
    menu_objects::PublishedMenu,
    traits::{MealPlanError, MenuManagement, Notifier, OrderManagement},
};

/// `MenuApi` publishes the daily menus and broadcasts them to subscribers.
pub struct MenuApi<B, N> {
    db: B,
    notifier: N,
    policy: GatingPolicy,
}

impl<B, N> Debug for MenuApi<B, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MenuApi ({})", self.policy)
    }
}

impl<B, N> MenuApi<B, N> {
    pub fn new(db: B, notifier: N, policy: GatingPolicy) -> Self {
        Self { db, notifier, policy }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, N> MenuApi<B, N>
where
    B: MenuManagement + OrderManagement,
    N: Notifier,
{
    /// Publishes a menu and sends it to every customer subscribed to that meal slot.
    ///
    /// Items are trimmed and blank items dropped. At least one item and a positive rate are required.
    ///
    /// If nobody is subscribed, the menu is saved with nothing sent. Otherwise every eligible customer is messaged
    /// once. When not a single message is accepted, a strict policy abandons the publication with
    /// [`MealPlanError::NotificationFailure`] and nothing is saved. A lenient policy saves the menu regardless.
    pub async fn publish_menu(&self, menu: NewMenu) -> Result<PublishedMenu, MealPlanError> {
        let menu = validate_menu(menu)?;
        let customers = self.db.fetch_eligible_customers(menu.menu_type).await?;
        let total_eligible = customers.len();
        if customers.is_empty() {
            info!("🍱️ No active {} subscribers. Saving the menu without notifications", menu.menu_type);
            let menu = self.db.insert_menu(menu).await?;
            return Ok(PublishedMenu { menu, notified_count: 0, total_eligible });
        }
        let items = menu.items_summary();
        let mut notified_count = 0;
        for customer in &customers {
            if self.notifier.send_template(&customer.whatsapp_number, menu.menu_type, &items).await {
                notified_count += 1;
            } else {
                warn!("🍱️ The {} menu could not be sent to customer #{}", menu.menu_type, customer.id);
            }
        }
        debug!("🍱️ {notified_count}/{total_eligible} {} subscribers notified", menu.menu_type);
        if notified_count == 0 {
            if self.policy.is_strict() {
                error!("🍱️ Every {} menu notification failed. The menu was not saved", menu.menu_type);
                return Err(MealPlanError::NotificationFailure(format!(
                    "any of the {total_eligible} {} subscribers",
                    menu.menu_type
                )));
            }
            warn!("🍱️ Every {} menu notification failed. Saving the menu anyway", menu.menu_type);
        }
        let menu = self.db.insert_menu(menu).await?;
        info!("🍱️ {} menu #{} published for {}", menu.menu_type, menu.id, menu.menu_date);
        Ok(PublishedMenu { menu, notified_count, total_eligible })
    }

    /// The most recently published menu for today.
    pub async fn todays_menu(&self, meal_type: MealType) -> Result<Menu, MealPlanError> {
        self.menu_for(today(), meal_type).await
    }

    pub async fn menu_for(&self, date: NaiveDate, meal_type: MealType) -> Result<Menu, MealPlanError> {
        self.db.fetch_latest_menu(date, meal_type).await?.ok_or(MealPlanError::MenuNotFound { meal_type, date })
    }
}

fn validate_menu(menu: NewMenu) -> Result<NewMenu, MealPlanError> {
    let menu_items =
        menu.menu_items.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from).collect::<Vec<_>>();
    if menu_items.is_empty() {
        return Err(MealPlanError::ValidationError("A menu needs at least one item".into()));
    }
    if !menu.rate_per_meal.is_positive() {
        return Err(MealPlanError::ValidationError("The rate per meal must be positive".into()));
    }
    Ok(NewMenu { menu_items, ..menu })
}
