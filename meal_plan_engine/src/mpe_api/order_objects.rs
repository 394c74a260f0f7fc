use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{MealSplit, OrderStatus, Rupees};

/// The three values the payment provider returns after a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentProof {
    pub order_ref: String,
    pub payment_ref: String,
    pub signature: String,
}

impl PaymentProof {
    pub fn new<O, P, S>(order_ref: O, payment_ref: P, signature: S) -> Self
    where
        O: Into<String>,
        P: Into<String>,
        S: Into<String>,
    {
        Self { order_ref: order_ref.into(), payment_ref: payment_ref.into(), signature: signature.into() }
    }
}

/// Everything needed to place a meal plan order.
///
/// `delivery_address` is only required when the WhatsApp number is not yet known. If `customer_id` is given, it must
/// match the customer registered under `whatsapp_number`.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub whatsapp_number: String,
    pub delivery_address: Option<String>,
    pub customer_id: Option<i64>,
    pub meal_quantity: i64,
    pub meal_split: MealSplit,
    pub total_amount: Rupees,
    /// An unverified payment reference, stored as-is.
    pub payment_id: Option<String>,
    /// When present, the order is only placed if the proof verifies.
    pub payment_proof: Option<PaymentProof>,
}

impl PlaceOrderRequest {
    pub fn new<S: Into<String>>(whatsapp_number: S, meal_quantity: i64, meal_split: MealSplit, total: Rupees) -> Self {
        Self {
            whatsapp_number: whatsapp_number.into(),
            delivery_address: None,
            customer_id: None,
            meal_quantity,
            meal_split,
            total_amount: total,
            payment_id: None,
            payment_proof: None,
        }
    }

    pub fn with_delivery_address<S: Into<String>>(mut self, address: S) -> Self {
        self.delivery_address = Some(address.into());
        self
    }

    pub fn with_customer_id(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_payment_id<S: Into<String>>(mut self, payment_id: S) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }

    pub fn with_payment_proof(mut self, proof: PaymentProof) -> Self {
        self.payment_proof = Some(proof);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub customer_id: Option<i64>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub status: Option<Vec<OrderStatus>>,
}

impl OrderQueryFilter {
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_customer_id(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.since.is_none() && self.until.is_none() && self.status.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(customer_id) = &self.customer_id {
            write!(f, "customer_id: {customer_id}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        if let Some(statuses) = &self.status {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(",");
            write!(f, "statuses: {statuses}. ")?;
        }
        Ok(())
    }
}
