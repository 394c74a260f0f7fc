use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

pub use meals_common::Rupees;

#[derive(Debug, Clone, Error)]
#[error("Invalid {kind}: {value}")]
pub struct ConversionError {
    kind: &'static str,
    value: String,
}

impl ConversionError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

//--------------------------------------       MealType        ---------------------------------------------------------
/// A single meal slot. Menus are published per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Lunch,
    Dinner,
}

impl Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealType::Lunch => write!(f, "lunch"),
            MealType::Dinner => write!(f, "dinner"),
        }
    }
}

impl FromStr for MealType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            _ => Err(ConversionError::new("meal type", s)),
        }
    }
}

//--------------------------------------       MealSplit       ---------------------------------------------------------
/// Which meal slots an order subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealSplit {
    Lunch,
    Dinner,
    Both,
}

impl MealSplit {
    /// The slots covered by this split, lunch first.
    pub fn meal_types(&self) -> &'static [MealType] {
        match self {
            MealSplit::Lunch => &[MealType::Lunch],
            MealSplit::Dinner => &[MealType::Dinner],
            MealSplit::Both => &[MealType::Lunch, MealType::Dinner],
        }
    }

    pub fn covers(&self, meal_type: MealType) -> bool {
        self.meal_types().contains(&meal_type)
    }
}

impl From<MealType> for MealSplit {
    fn from(value: MealType) -> Self {
        match value {
            MealType::Lunch => MealSplit::Lunch,
            MealType::Dinner => MealSplit::Dinner,
        }
    }
}

impl Display for MealSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealSplit::Lunch => write!(f, "lunch"),
            MealSplit::Dinner => write!(f, "dinner"),
            MealSplit::Both => write!(f, "both"),
        }
    }
}

impl FromStr for MealSplit {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "both" => Ok(Self::Both),
            _ => Err(ConversionError::new("meal split", s)),
        }
    }
}

//--------------------------------------     PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No verified payment is attached to the order.
    Pending,
    /// The payment signature was verified when the order was placed.
    Success,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Success => write!(f, "success"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

//--------------------------------------      OrderStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// The order still has meals to deliver.
    Active,
    /// Every prepaid meal has been delivered, or an admin closed the order.
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        *self == OrderStatus::Active && matches!(next, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Active => write!(f, "active"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ConversionError::new("order status", s)),
        }
    }
}

//--------------------------------------    DeliveryStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Scheduled,
    Preparing,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    /// Deliveries only move forward. Any non-terminal state may be cancelled.
    pub fn can_transition_to(&self, next: DeliveryStatus) -> bool {
        use DeliveryStatus::*;
        match self {
            Scheduled => matches!(next, Preparing | InTransit | Delivered | Cancelled),
            Preparing => matches!(next, InTransit | Delivered | Cancelled),
            InTransit => matches!(next, Delivered | Cancelled),
            Delivered | Cancelled => false,
        }
    }
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Scheduled => write!(f, "scheduled"),
            DeliveryStatus::Preparing => write!(f, "preparing"),
            DeliveryStatus::InTransit => write!(f, "in_transit"),
            DeliveryStatus::Delivered => write!(f, "delivered"),
            DeliveryStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "preparing" => Ok(Self::Preparing),
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ConversionError::new("delivery status", s)),
        }
    }
}

//--------------------------------------       Customer        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    /// Normalized messaging address (digits only, country code included).
    pub whatsapp_number: String,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub whatsapp_number: String,
    pub delivery_address: String,
}

impl NewCustomer {
    pub fn new<S: Into<String>, A: Into<String>>(whatsapp_number: S, delivery_address: A) -> Self {
        Self { whatsapp_number: whatsapp_number.into(), delivery_address: delivery_address.into() }
    }
}

//--------------------------------------         Menu          ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: i64,
    pub menu_type: MealType,
    pub menu_date: NaiveDate,
    pub menu_items: Json<Vec<String>>,
    pub rate_per_meal: Rupees,
    pub created_at: DateTime<Utc>,
}

impl Menu {
    pub fn items(&self) -> &[String] {
        self.menu_items.as_slice()
    }

    /// The menu items as a single comma-separated line, the way they appear in notifications.
    pub fn items_summary(&self) -> String {
        self.items().join(", ")
    }
}

#[derive(Debug, Clone)]
pub struct NewMenu {
    pub menu_type: MealType,
    pub menu_date: NaiveDate,
    pub menu_items: Vec<String>,
    pub rate_per_meal: Rupees,
}

impl NewMenu {
    pub fn new(menu_type: MealType, menu_date: NaiveDate, menu_items: Vec<String>, rate_per_meal: Rupees) -> Self {
        Self { menu_type, menu_date, menu_items, rate_per_meal }
    }

    pub fn items_summary(&self) -> String {
        self.menu_items.join(", ")
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Prepaid meals remaining. Never negative.
    pub meal_quantity: i64,
    pub meal_split: MealSplit,
    pub total_amount: Rupees,
    pub payment_order_ref: Option<String>,
    pub payment_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn has_meals_remaining(&self) -> bool {
        self.order_status == OrderStatus::Active && self.meal_quantity > 0
    }
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub meal_quantity: i64,
    pub meal_split: MealSplit,
    pub total_amount: Rupees,
    pub payment_order_ref: Option<String>,
    pub payment_id: Option<String>,
    pub payment_status: PaymentStatus,
}

impl NewOrder {
    pub fn new(customer_id: i64, meal_quantity: i64, meal_split: MealSplit, total_amount: Rupees) -> Self {
        Self {
            customer_id,
            meal_quantity,
            meal_split,
            total_amount,
            payment_order_ref: None,
            payment_id: None,
            payment_status: PaymentStatus::Pending,
        }
    }

    pub fn with_payment_id<S: Into<String>>(mut self, payment_id: S) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }

    pub fn with_verified_payment<S: Into<String>, P: Into<String>>(mut self, order_ref: S, payment_id: P) -> Self {
        self.payment_order_ref = Some(order_ref.into());
        self.payment_id = Some(payment_id.into());
        self.payment_status = PaymentStatus::Success;
        self
    }
}

/// An order along with its customer and delivery history, as shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Customer,
    pub deliveries: Vec<Delivery>,
}

//--------------------------------------       Delivery        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: i64,
    pub order_id: i64,
    pub delivery_date: NaiveDate,
    /// Mirrors the meal split of the order that was debited.
    pub meal_type: MealSplit,
    pub customer_response: String,
    pub delivery_status: DeliveryStatus,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub order_id: i64,
    pub delivery_date: NaiveDate,
    pub meal_type: MealSplit,
    pub customer_response: String,
}

impl NewDelivery {
    pub fn new<S: Into<String>>(order: &Order, delivery_date: NaiveDate, customer_response: S) -> Self {
        Self {
            order_id: order.id,
            delivery_date,
            meal_type: order.meal_split,
            customer_response: customer_response.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    #[serde(flatten)]
    pub delivery: Delivery,
    pub order: Order,
    pub customer: Customer,
}

//--------------------------------------    InboundMessage     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub id: i64,
    /// Provider message id. Used to drop redelivered webhooks.
    pub message_id: Option<String>,
    pub sender: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInboundMessage {
    pub message_id: Option<String>,
    pub sender: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}
