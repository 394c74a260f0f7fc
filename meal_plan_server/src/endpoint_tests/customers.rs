use actix_web::http::StatusCode;
use meal_plan_engine::{test_utils::prepare_env::prepare_test_db, AccountApi, CustomerManagement, SqliteDatabase};
use serde_json::json;

use super::helpers::{add_data, get_request, json, post_request};
use crate::routes::{CustomersCountRoute, UpsertCustomerRoute};

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    move |cfg| {
        add_data(cfg, AccountApi::new(db));
        cfg.service(UpsertCustomerRoute::<SqliteDatabase>::new()).service(CustomersCountRoute::<SqliteDatabase>::new());
    }
}

#[actix_web::test]
async fn create_then_upsert_customer() {
    let db = prepare_test_db().await;
    let body = json!({"whatsappNumber": "919000000001", "deliveryAddress": "Flat 1"});
    let (status, res) = post_request("/customer/create", body, configure(db.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = json(&res);
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Customer created successfully");
    assert_eq!(created["data"]["whatsappNumber"], "919000000001");
    assert_eq!(created["data"]["deliveryAddress"], "Flat 1");

    let body = json!({"whatsappNumber": "+91 90000-00001", "deliveryAddress": "Somewhere else"});
    let (status, res) = post_request("/customer/create", body, configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let existing = json(&res);
    assert_eq!(existing["message"], "Customer already exists");
    assert_eq!(existing["data"]["id"], created["data"]["id"]);
    assert_eq!(existing["data"]["deliveryAddress"], "Flat 1");

    let (status, res) = get_request("/customer/customersCount", configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["data"]["count"], 1);
    assert_eq!(db.customer_count().await.unwrap(), 1);
}

#[actix_web::test]
async fn missing_fields_are_rejected() {
    let db = prepare_test_db().await;
    let (status, res) =
        post_request("/customer/create", json!({"whatsappNumber": "919000000001"}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&res)["error"].as_str().unwrap().contains("delivery address"));

    let (status, _) =
        post_request("/customer/create", json!({"deliveryAddress": "Flat 1"}), configure(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({"whatsappNumber": "call me", "deliveryAddress": "Flat 1"});
    let (status, _) = post_request("/customer/create", body, configure(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(db.customer_count().await.unwrap(), 0);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let db = prepare_test_db().await;
    let (status, res) = post_request("/customer/create", json!(["not", "an", "object"]), configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&res)["error"].as_str().unwrap().starts_with("Could not read request body"));
}
