use actix_web::{http::StatusCode, web::ServiceConfig};
use meal_plan_engine::{
    db_types::{MealSplit, MealType},
    helpers::today,
    test_utils::prepare_env::prepare_test_db,
    GatingPolicy,
    MenuApi,
    MenuManagement,
    SqliteDatabase,
};
use serde_json::{json, Value};

use super::{
    helpers::{add_data, get_request, json, post_request, publish_todays_menu, subscriber},
    mocks::{accepting_messenger, failing_messenger, MockMessenger},
};
use crate::routes::{PublishMenuRoute, TodaysMenuRoute};

fn configure(db: SqliteDatabase, messenger: MockMessenger, policy: GatingPolicy) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        add_data(cfg, MenuApi::new(db, messenger, policy));
        cfg.service(PublishMenuRoute::<SqliteDatabase, MockMessenger>::new())
            .service(TodaysMenuRoute::<SqliteDatabase, MockMessenger>::new());
    }
}

fn default_app(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    configure(db, accepting_messenger(), GatingPolicy::default())
}

fn lunch_menu() -> Value {
    json!({
        "menuType": "lunch",
        "menuDate": today().to_string(),
        "menuItems": ["Rice", " Sambar ", ""],
        "ratePerMeal": 80
    })
}

#[actix_web::test]
async fn publish_menu_notifies_subscribers() {
    let db = prepare_test_db().await;
    subscriber(&db, "919000000001", 10, MealSplit::Lunch).await;
    subscriber(&db, "919000000002", 4, MealSplit::Dinner).await;
    let mut messenger = MockMessenger::new();
    messenger
        .expect_send_template()
        .withf(|address, meal_type, items| {
            address == "919000000001" && *meal_type == MealType::Lunch && items == "Rice, Sambar"
        })
        .times(1)
        .returning(|_, _, _| true);
    let app = configure(db.clone(), messenger, GatingPolicy::default());
    let (status, res) = post_request("/menu/add", lunch_menu(), app).await;
    assert_eq!(status, StatusCode::CREATED);
    let res = json(&res);
    assert_eq!(res["data"]["notifiedCount"], 1);
    assert_eq!(res["data"]["totalEligible"], 1);
    assert_eq!(res["data"]["menu"]["menuItems"], json!(["Rice", "Sambar"]));
    let menu = db.fetch_latest_menu(today(), MealType::Lunch).await.unwrap().unwrap();
    assert_eq!(menu.items(), ["Rice", "Sambar"]);
}

#[actix_web::test]
async fn publish_menu_without_subscribers() {
    let db = prepare_test_db().await;
    let mut messenger = MockMessenger::new();
    messenger.expect_send_template().never();
    let app = configure(db, messenger, GatingPolicy::Strict);
    let (status, res) = post_request("/menu/add", lunch_menu(), app).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json(&res)["data"]["notifiedCount"], 0);
}

#[actix_web::test]
async fn strict_policy_rejects_menu_when_no_one_is_notified() {
    let db = prepare_test_db().await;
    subscriber(&db, "919000000001", 10, MealSplit::Both).await;
    let app = configure(db.clone(), failing_messenger(), GatingPolicy::Strict);
    let (status, res) = post_request("/menu/add", lunch_menu(), app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&res)["retryable"], true);
    assert!(db.fetch_latest_menu(today(), MealType::Lunch).await.unwrap().is_none());
}

#[actix_web::test]
async fn lenient_policy_saves_menu_when_no_one_is_notified() {
    let db = prepare_test_db().await;
    subscriber(&db, "919000000001", 10, MealSplit::Both).await;
    let app = configure(db.clone(), failing_messenger(), GatingPolicy::Lenient);
    let (status, res) = post_request("/menu/add", lunch_menu(), app).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json(&res)["data"]["notifiedCount"], 0);
    assert!(db.fetch_latest_menu(today(), MealType::Lunch).await.unwrap().is_some());
}

#[actix_web::test]
async fn invalid_menus() {
    let db = prepare_test_db().await;
    let date = today().to_string();
    let no_items = json!({"menuType": "lunch", "menuDate": date, "menuItems": [" "], "ratePerMeal": 80});
    let (status, _) = post_request("/menu/add", no_items, default_app(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let brunch = json!({"menuType": "brunch", "menuDate": date, "menuItems": ["Eggs"], "ratePerMeal": 80});
    let (status, _) = post_request("/menu/add", brunch, default_app(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let no_date = json!({"menuType": "dinner", "menuItems": ["Roti"], "ratePerMeal": 80});
    let (status, _) = post_request("/menu/add", no_date, default_app(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(db.fetch_latest_menu(today(), MealType::Lunch).await.unwrap().is_none());
}

#[actix_web::test]
async fn todays_menu() {
    let db = prepare_test_db().await;
    publish_todays_menu(&db, MealType::Dinner, &["Roti", "Paneer"]).await;
    publish_todays_menu(&db, MealType::Dinner, &["Biryani"]).await;

    let (status, res) = get_request("/menu/today?menuType=dinner", default_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let res = json(&res);
    assert_eq!(res["data"]["menuType"], "dinner");
    assert_eq!(res["data"]["menuItems"], json!(["Biryani"]));

    let (status, _) = get_request("/menu/today?menuType=lunch", default_app(db.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, res) = get_request("/menu/today", default_app(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&res)["error"].as_str().unwrap().contains("menuType is required"));

    let (status, _) = get_request("/menu/today?menuType=supper", default_app(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
