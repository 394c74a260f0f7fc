use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Customer, MealSplit, Menu, NewOrder, Order},
    gating::GatingPolicy,
    helpers::{normalize_whatsapp_number, today},
    mpe_api::accounts_api::register_customer,
    order_objects::PlaceOrderRequest,
    traits::{CustomerManagement, MealPlanError, MenuManagement, Notifier, OrderManagement, PaymentVerifier},
};

/// `OrderFlowApi` handles new meal plan purchases.
///
/// Placing an order registers the customer if needed, checks the payment (when proof is supplied), and sends the
/// customer today's menu as a welcome message.
pub struct OrderFlowApi<B, N, V> {
    db: B,
    notifier: N,
    verifier: V,
    policy: GatingPolicy,
}

impl<B, N, V> Debug for OrderFlowApi<B, N, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({})", self.policy)
    }
}

impl<B, N, V> OrderFlowApi<B, N, V> {
    pub fn new(db: B, notifier: N, verifier: V, policy: GatingPolicy) -> Self {
        Self { db, notifier, verifier, policy }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, N, V> OrderFlowApi<B, N, V>
where
    B: CustomerManagement + MenuManagement + OrderManagement,
    N: Notifier,
    V: PaymentVerifier,
{
    /// Places a new order.
    ///
    /// The steps are, in order:
    /// * Validate the quantity and amount, and normalize the WhatsApp number.
    /// * If payment proof is attached, verify it. A bad signature fails with [`MealPlanError::VerificationError`]
    ///   before anything is written. Verified orders are stored with a successful payment status; all others are
    ///   pending.
    /// * Fetch or create the customer. A `customer_id` in the request must match the customer on that number.
    /// * Find today's menu for the order's meal split. For `both`, the lunch menu is used, falling back to dinner.
    /// * Send the menu to the customer and save the order. Under a strict policy the message goes first, and a
    ///   failed send abandons the order. Under a lenient policy the order is saved first and a failed send is only
    ///   logged.
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<Order, MealPlanError> {
        validate_order_request(&request)?;
        let number = normalize_whatsapp_number(&request.whatsapp_number)?;
        let mut new_order = NewOrder::new(0, request.meal_quantity, request.meal_split, request.total_amount);
        if let Some(payment_id) = &request.payment_id {
            new_order = new_order.with_payment_id(payment_id);
        }
        if let Some(proof) = &request.payment_proof {
            if !self.verifier.verify(proof) {
                warn!("📦️ Order for {number} rejected. Payment {} could not be verified", proof.payment_ref);
                return Err(MealPlanError::VerificationError);
            }
            new_order = new_order.with_verified_payment(&proof.order_ref, &proof.payment_ref);
        }
        let (customer, _) = register_customer(&self.db, &number, request.delivery_address.as_deref()).await?;
        if let Some(id) = request.customer_id {
            if id != customer.id {
                return Err(MealPlanError::ValidationError(format!(
                    "Customer #{id} does not match the customer registered for {number}"
                )));
            }
        }
        new_order.customer_id = customer.id;
        let menu = self.menu_for_split(request.meal_split).await?;
        let order = if self.policy.is_strict() {
            if !self.send_welcome(&customer, &menu).await {
                error!("📦️ Could not send today's menu to {number}. The order was not saved");
                return Err(MealPlanError::NotificationFailure(number));
            }
            self.db.insert_order(new_order).await?
        } else {
            let order = self.db.insert_order(new_order).await?;
            if !self.send_welcome(&customer, &menu).await {
                warn!("📦️ Could not send today's menu to {number}. Order #{} was saved anyway", order.id);
            }
            order
        };
        info!(
            "📦️ Order #{} placed for customer #{}: {} {} meals for {} (payment {})",
            order.id, customer.id, order.meal_quantity, order.meal_split, order.total_amount, order.payment_status
        );
        Ok(order)
    }

    async fn menu_for_split(&self, split: MealSplit) -> Result<Menu, MealPlanError> {
        let date = today();
        for meal_type in split.meal_types() {
            if let Some(menu) = self.db.fetch_latest_menu(date, *meal_type).await? {
                return Ok(menu);
            }
        }
        let meal_type = split.meal_types()[0];
        Err(MealPlanError::MenuNotFound { meal_type, date })
    }

    async fn send_welcome(&self, customer: &Customer, menu: &Menu) -> bool {
        self.notifier.send_template(&customer.whatsapp_number, menu.menu_type, &menu.items_summary()).await
    }
}

fn validate_order_request(request: &PlaceOrderRequest) -> Result<(), MealPlanError> {
    if request.meal_quantity <= 0 {
        return Err(MealPlanError::ValidationError("The meal quantity must be at least 1".into()));
    }
    if !request.total_amount.is_positive() {
        return Err(MealPlanError::ValidationError("The total amount must be positive".into()));
    }
    Ok(())
}
