use std::time::Duration;

use actix_web::{dev::Server, guard, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use meal_plan_engine::{
    helpers::RazorpayVerifier,
    AccountApi,
    DeliveryApi,
    MenuApi,
    OrderFlowApi,
    ReplyApi,
    SqliteDatabase,
};
use whatsapp_tools::WhatsappApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    helpers::{json_config, path_config, query_config},
    integrations::whatsapp::WhatsappNotifier,
    middleware::HmacMiddlewareFactory,
    routes::{
        health,
        verify_webhook,
        AllOrdersRoute,
        CustomersCountRoute,
        InboundMessagesRoute,
        PlaceOrderRoute,
        PublishMenuRoute,
        SendMessageRoute,
        TodaysDeliveriesRoute,
        TodaysMenuRoute,
        TodaysOrdersRoute,
        UpdateDeliveryStatusRoute,
        UpdateOrderStatusRoute,
        UpsertCustomerRoute,
        VerifyPaymentRoute,
        WhatsappWebhookRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.auto_migrate {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    } else {
        info!("🗃️ MEALS_AUTO_MIGRATE is off. Assuming the database schema is up to date");
    }
    let whatsapp =
        WhatsappApi::new(config.whatsapp.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let notifier = WhatsappNotifier::new(whatsapp);
    let verifier = RazorpayVerifier::new(config.razorpay_key_secret.clone());
    info!("🚀️ Gating policy is {}", config.gating_policy);
    let srv = create_server_instance(config, db, notifier, verifier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    notifier: WhatsappNotifier,
    verifier: RazorpayVerifier,
) -> Result<Server, ServerError> {
    let policy = config.gating_policy;
    let webhook_config = config.webhook.clone();
    let srv = HttpServer::new(move || {
        let accounts_api = AccountApi::new(db.clone());
        let menu_api = MenuApi::new(db.clone(), notifier.clone(), policy);
        let orders_api = OrderFlowApi::new(db.clone(), notifier.clone(), verifier.clone(), policy);
        let reply_api = ReplyApi::new(db.clone());
        let delivery_api = DeliveryApi::new(db.clone());
        // Only POSTs are signed. The GET handshake is registered outside this scope.
        let webhook_scope = web::scope("/whatsapp/webhook")
            .guard(guard::Post())
            .wrap(HmacMiddlewareFactory::whatsapp(webhook_config.app_secret.clone(), webhook_config.signature_checks))
            .service(WhatsappWebhookRoute::<SqliteDatabase>::new());
        let api_scope = web::scope("/api/v1")
            .service(UpsertCustomerRoute::<SqliteDatabase>::new())
            .service(CustomersCountRoute::<SqliteDatabase>::new())
            .service(PublishMenuRoute::<SqliteDatabase, WhatsappNotifier>::new())
            .service(TodaysMenuRoute::<SqliteDatabase, WhatsappNotifier>::new())
            .service(PlaceOrderRoute::<SqliteDatabase, WhatsappNotifier, RazorpayVerifier>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase, WhatsappNotifier, RazorpayVerifier>::new())
            .service(TodaysOrdersRoute::<SqliteDatabase>::new())
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(TodaysDeliveriesRoute::<SqliteDatabase>::new())
            .service(UpdateDeliveryStatusRoute::<SqliteDatabase>::new())
            .service(verify_webhook)
            .service(webhook_scope)
            .service(InboundMessagesRoute::<SqliteDatabase>::new())
            .service(SendMessageRoute::<WhatsappNotifier>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("meals::access_log"))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(menu_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(reply_api))
            .app_data(web::Data::new(delivery_api))
            .app_data(web::Data::new(notifier.clone()))
            .app_data(web::Data::new(webhook_config.clone()))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
