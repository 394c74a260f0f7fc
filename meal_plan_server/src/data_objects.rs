use std::fmt::Display;

use chrono::NaiveDate;
use meal_plan_engine::{
    db_types::{MealSplit, MealType, NewMenu, Rupees},
    order_objects::{PaymentProof, PlaceOrderRequest},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The envelope for every successful response that carries a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, message: None, data }
    }

    pub fn with_message<S: Display>(mut self, message: S) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub delivery_address: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CustomerCount {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRequest {
    pub menu_type: MealType,
    pub menu_date: NaiveDate,
    pub menu_items: Vec<String>,
    pub rate_per_meal: Rupees,
}

impl From<MenuRequest> for NewMenu {
    fn from(req: MenuRequest) -> Self {
        NewMenu::new(req.menu_type, req.menu_date, req.menu_items, req.rate_per_meal)
    }
}

/// `?menuType=lunch`. Kept as a string so that a missing or unknown meal type gets a helpful 400.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuQuery {
    pub menu_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub meal_quantity: i64,
    pub meal_split: MealSplit,
    pub total_amount: Rupees,
    pub whatsapp_number: String,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

impl From<OrderRequest> for PlaceOrderRequest {
    fn from(req: OrderRequest) -> Self {
        let mut order =
            PlaceOrderRequest::new(req.whatsapp_number, req.meal_quantity, req.meal_split, req.total_amount);
        order.customer_id = req.customer_id;
        order.delivery_address = req.delivery_address;
        order.payment_id = req.payment_id;
        order
    }
}

/// The Razorpay checkout handler's response, plus the order it paid for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerificationRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(flatten)]
    pub order: OrderRequest,
}

impl From<PaymentVerificationRequest> for PlaceOrderRequest {
    fn from(req: PaymentVerificationRequest) -> Self {
        let proof = PaymentProof::new(req.razorpay_order_id, req.razorpay_payment_id, req.razorpay_signature);
        PlaceOrderRequest::from(req.order).with_payment_proof(proof)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboxQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeformMessage {
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub message: String,
}

/// The query Meta sends when subscribing to the webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookVerification {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}
