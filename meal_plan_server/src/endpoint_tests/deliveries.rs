use actix_web::{http::StatusCode, web::ServiceConfig};
use meal_plan_engine::{
    db_types::{Delivery, MealSplit, NewDelivery},
    helpers::{today, CONFIRMED_RESPONSE},
    test_utils::prepare_env::prepare_test_db,
    DeliveryApi,
    DeliveryManagement,
    SqliteDatabase,
};
use serde_json::json;

use super::helpers::{add_data, get_request, json, patch_request, subscriber};
use crate::routes::{TodaysDeliveriesRoute, UpdateDeliveryStatusRoute};

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        add_data(cfg, DeliveryApi::new(db));
        cfg.service(TodaysDeliveriesRoute::<SqliteDatabase>::new())
            .service(UpdateDeliveryStatusRoute::<SqliteDatabase>::new());
    }
}

async fn confirmed_delivery(db: &SqliteDatabase, number: &str) -> Delivery {
    let order = subscriber(db, number, 4, MealSplit::Dinner).await;
    let new_delivery = NewDelivery::new(&order, today(), CONFIRMED_RESPONSE);
    let (delivery, _) = db.confirm_delivery(new_delivery).await.unwrap().unwrap();
    delivery
}

#[actix_web::test]
async fn todays_deliveries() {
    let db = prepare_test_db().await;
    let (status, res) = get_request("/delivery/today", configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["data"], json!([]));

    let first = confirmed_delivery(&db, "919000000001").await;
    let second = confirmed_delivery(&db, "919000000002").await;
    let (status, res) = get_request("/delivery/today", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let deliveries = json(&res)["data"].as_array().unwrap().clone();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[1]["id"], first.id);
    assert_eq!(deliveries[1]["deliveryStatus"], "scheduled");
    assert_eq!(deliveries[1]["customerResponse"], "Yes");
    assert_eq!(deliveries[1]["customer"]["whatsappNumber"], "919000000001");
    assert_eq!(deliveries[1]["customer"]["deliveryAddress"], "Flat 1, MG Road");
    assert_eq!(deliveries[1]["order"]["mealQuantity"], 3);
    assert_eq!(deliveries[0]["id"], second.id);
}

#[actix_web::test]
async fn delivery_status_updates() {
    let db = prepare_test_db().await;
    let delivery = confirmed_delivery(&db, "919000000001").await;
    let path = format!("/delivery/{}/status", delivery.id);

    let (status, res) = patch_request(&path, json!({"status": "in_transit"}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["data"]["deliveryStatus"], "in_transit");
    assert!(json(&res)["data"]["deliveredAt"].is_null());

    let (status, res) = patch_request(&path, json!({"status": "delivered"}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json(&res)["data"]["deliveredAt"].is_string());

    let (status, res) = patch_request(&path, json!({"status": "preparing"}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json(&res)["error"].as_str().unwrap().contains("delivered"));

    let missing = format!("/delivery/{}/status", delivery.id + 100);
    let (status, _) = patch_request(&missing, json!({"status": "delivered"}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = patch_request(&path, json!({}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = patch_request(&path, json!({"status": "lost"}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(db.fetch_delivery(delivery.id).await.unwrap().unwrap().delivered_at.is_some());
}
