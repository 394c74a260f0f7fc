use actix_web::{
    guard,
    http::{header::ContentType, StatusCode},
    test,
    test::TestRequest,
    web::{self, ServiceConfig},
    App,
};
use meal_plan_engine::{
    db_types::MealSplit,
    test_utils::prepare_env::prepare_test_db,
    DeliveryManagement,
    InboxManagement,
    OrderManagement,
    ReplyApi,
    SqliteDatabase,
};
use meals_common::Secret;
use serde_json::{json, Value};

use super::{
    helpers::{add_data, get_request, json, post_request, send_request, subscriber},
    mocks::{accepting_messenger, MockMessenger},
};
use crate::{
    config::WebhookConfig,
    helpers::calculate_hmac,
    middleware::{HmacMiddlewareFactory, WHATSAPP_SIGNATURE_HEADER},
    routes::{verify_webhook, InboundMessagesRoute, SendMessageRoute, WhatsappWebhookRoute},
};

const APP_SECRET: &str = "meta-app-secret";

fn webhook_config(signature_checks: bool) -> WebhookConfig {
    WebhookConfig {
        app_secret: Secret::new(APP_SECRET.to_string()),
        signature_checks,
        verify_token: Secret::new("let-me-in".to_string()),
    }
}

fn configure(
    db: SqliteDatabase,
    messenger: MockMessenger,
    webhook: WebhookConfig,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let signatures = HmacMiddlewareFactory::whatsapp(webhook.app_secret.clone(), webhook.signature_checks);
        add_data(cfg, ReplyApi::new(db));
        add_data(cfg, messenger);
        add_data(cfg, webhook);
        cfg.service(verify_webhook)
            .service(
                web::scope("/whatsapp/webhook")
                    .guard(guard::Post())
                    .wrap(signatures)
                    .service(WhatsappWebhookRoute::<SqliteDatabase>::new()),
            )
            .service(InboundMessagesRoute::<SqliteDatabase>::new())
            .service(SendMessageRoute::<MockMessenger>::new());
    }
}

fn unsigned_app(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    configure(db, accepting_messenger(), webhook_config(false))
}

fn text_message(from: &str, id: &str, timestamp: i64, body: &str) -> Value {
    json!({
        "from": from,
        "id": id,
        "timestamp": timestamp.to_string(),
        "type": "text",
        "text": { "body": body }
    })
}

fn envelope(messages: Vec<Value>) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "102290129340398",
            "changes": [{
                "field": "messages",
                "value": { "messaging_product": "whatsapp", "messages": messages }
            }]
        }]
    })
}

#[actix_web::test]
async fn yes_replies_schedule_deliveries() {
    let db = prepare_test_db().await;
    let order = subscriber(&db, "919000000001", 10, MealSplit::Lunch).await;
    let replies = vec![
        text_message("919000000001", "wamid.1", 1_718_000_001, "yes"),
        text_message("919000000001", "wamid.2", 1_718_000_002, "Yes "),
        text_message("919000000001", "wamid.3", 1_718_000_003, "YES"),
        text_message("919000000001", "wamid.4", 1_718_000_004, "not today"),
    ];
    let (status, res) = post_request("/whatsapp/webhook", envelope(replies), unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["success"], true);
    assert_eq!(json(&res)["message"], "4 messages received");
    let order = db.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(order.meal_quantity, 7);
    let deliveries = db.fetch_deliveries_for_order(order.id).await.unwrap();
    assert_eq!(deliveries.len(), 3);
    assert!(deliveries.iter().all(|d| d.customer_response == "Yes"));
    assert_eq!(db.fetch_inbound_messages(10).await.unwrap().len(), 4);
}

#[actix_web::test]
async fn redelivered_messages_are_processed_once() {
    let db = prepare_test_db().await;
    let order = subscriber(&db, "919000000001", 2, MealSplit::Dinner).await;
    let reply = || envelope(vec![text_message("919000000001", "wamid.dup", 1_718_000_001, "yes")]);
    for _ in 0..3 {
        let (status, _) = post_request("/whatsapp/webhook", reply(), unsigned_app(db.clone())).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(db.fetch_order(order.id).await.unwrap().unwrap().meal_quantity, 1);
    assert_eq!(db.fetch_inbound_messages(10).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn unknown_senders_and_exhausted_orders_are_only_logged() {
    let db = prepare_test_db().await;
    let order = subscriber(&db, "919000000001", 1, MealSplit::Lunch).await;
    let replies = vec![
        text_message("919000000001", "wamid.1", 1_718_000_001, "yes"),
        text_message("919000000001", "wamid.2", 1_718_000_002, "yes"),
        text_message("919111111111", "wamid.3", 1_718_000_003, "yes"),
    ];
    let (status, _) = post_request("/whatsapp/webhook", envelope(replies), unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.fetch_order(order.id).await.unwrap().unwrap().meal_quantity, 0);
    assert_eq!(db.fetch_inbound_messages(10).await.unwrap().len(), 3);
}

#[actix_web::test]
async fn webhook_always_acknowledges() {
    let db = prepare_test_db().await;
    let req = TestRequest::post().uri("/whatsapp/webhook").insert_header(ContentType::json()).set_payload("not json");
    let (status, res) = send_request(req, unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["success"], false);

    let (status, _) = post_request("/whatsapp/webhook", json!({"hello": "world"}), unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let statuses = json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{ "field": "messages", "value": { "statuses": [{ "id": "wamid.1", "status": "read" }] } }]
        }]
    });
    let (status, res) = post_request("/whatsapp/webhook", statuses, unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["message"], "0 messages received");

    let flat = text_message("919000000001", "wamid.9", 1_718_000_001, "hello");
    let (status, res) = post_request("/whatsapp/webhook", flat, unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["message"], "1 messages received");
    assert_eq!(db.fetch_inbound_messages(10).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn inbound_message_log() {
    let db = prepare_test_db().await;
    let replies =
        (1..=3).map(|i| text_message("919000000001", &format!("wamid.{i}"), 1_718_000_000 + i, "hi")).collect();
    let (status, _) = post_request("/whatsapp/webhook", envelope(replies), unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, res) = get_request("/whatsapp/responses", unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let messages = json(&res)["data"].as_array().unwrap().clone();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["messageId"], "wamid.3");
    assert_eq!(messages[0]["sender"], "919000000001");
    assert_eq!(messages[0]["message"], "hi");

    let (status, res) = get_request("/whatsapp/responses?limit=2", unsigned_app(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&res)["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn subscription_handshake() {
    let db = prepare_test_db().await;
    let path = "/whatsapp/webhook?hub.mode=subscribe&hub.verify_token=let-me-in&hub.challenge=1158201444";
    let (status, res) = get_request(path, unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res, "1158201444");

    let path = "/whatsapp/webhook?hub.mode=subscribe&hub.verify_token=guess&hub.challenge=1158201444";
    let (status, _) = get_request(path, unsigned_app(db.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut config = webhook_config(false);
    config.verify_token = Secret::default();
    let path = "/whatsapp/webhook?hub.mode=subscribe&hub.verify_token=&hub.challenge=1158201444";
    let (status, _) = get_request(path, configure(db, accepting_messenger(), config)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn send_freeform_message() {
    let db = prepare_test_db().await;
    let mut messenger = MockMessenger::new();
    messenger
        .expect_send_freeform()
        .withf(|address, message| address == "919000000001" && message == "Your order is on its way")
        .times(1)
        .returning(|_, _| ());
    let body = json!({"whatsappNumber": "+91 90000 00001", "message": " Your order is on its way "});
    let app = configure(db.clone(), messenger, webhook_config(false));
    let (status, res) = post_request("/whatsapp/send", body, app).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json(&res)["success"], true);

    let mut messenger = MockMessenger::new();
    messenger.expect_send_freeform().never();
    let app = configure(db.clone(), messenger, webhook_config(false));
    let (status, _) = post_request("/whatsapp/send", json!({"whatsappNumber": "919000000001"}), app).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut messenger = MockMessenger::new();
    messenger.expect_send_freeform().never();
    let app = configure(db, messenger, webhook_config(false));
    let (status, _) = post_request("/whatsapp/send", json!({"whatsappNumber": "abc", "message": "hi"}), app).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn signed_webhook_call(config: WebhookConfig, body: &str, signature: Option<String>) -> StatusCode {
    let db = prepare_test_db().await;
    let app = test::init_service(App::new().configure(configure(db, accepting_messenger(), config))).await;
    let mut req =
        TestRequest::post().uri("/whatsapp/webhook").insert_header(ContentType::json()).set_payload(body.to_string());
    if let Some(signature) = signature {
        req = req.insert_header((WHATSAPP_SIGNATURE_HEADER, signature));
    }
    match test::try_call_service(&app, req.to_request()).await {
        Ok(res) => res.status(),
        Err(e) => e.as_response_error().status_code(),
    }
}

#[actix_web::test]
async fn webhook_signatures() {
    let _ = env_logger::try_init();
    let body = envelope(vec![text_message("919000000001", "wamid.1", 1_718_000_001, "yes")]).to_string();
    let good = calculate_hmac(APP_SECRET, body.as_bytes());
    let forged = calculate_hmac("someone-else", body.as_bytes());

    assert_eq!(signed_webhook_call(webhook_config(true), &body, Some(good.clone())).await, StatusCode::OK);
    assert_eq!(signed_webhook_call(webhook_config(true), &body, Some(forged)).await, StatusCode::FORBIDDEN);
    assert_eq!(signed_webhook_call(webhook_config(true), &body, None).await, StatusCode::FORBIDDEN);
    let garbled = Some("sha256=zz".to_string());
    assert_eq!(signed_webhook_call(webhook_config(true), &body, garbled).await, StatusCode::FORBIDDEN);
    assert_eq!(signed_webhook_call(webhook_config(false), &body, None).await, StatusCode::OK);

    let mut unset = webhook_config(true);
    unset.app_secret = Secret::default();
    assert_eq!(signed_webhook_call(unset, &body, Some(good)).await, StatusCode::FORBIDDEN);
}
