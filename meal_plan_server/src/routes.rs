//! Request handler definitions
//!
//! Define each route and its handler here. Everything except `/health` is mounted under `/api/v1` by the server.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Database calls and outbound messages are all async, so keep it
//! that way: never block inside a handler.
use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use meal_plan_engine::{
    db_types::{DeliveryStatus, MealType, OrderStatus},
    helpers::normalize_whatsapp_number,
    order_objects::{OrderQueryFilter, PlaceOrderRequest},
    reply_objects::ReplyOutcome,
    traits::{MealPlanDatabase, Notifier, PaymentVerifier},
    AccountApi,
    DeliveryApi,
    MenuApi,
    OrderFlowApi,
    ReplyApi,
};
use whatsapp_tools::WebhookPayload;

use crate::{
    config::WebhookConfig,
    data_objects::{
        CustomerCount,
        CustomerRequest,
        DataResponse,
        FreeformMessage,
        InboxQuery,
        JsonResponse,
        MenuQuery,
        MenuRequest,
        OrderRequest,
        PaymentVerificationRequest,
        StatusUpdate,
        WebhookVerification,
    },
    errors::ServerError,
    integrations::whatsapp::replies_from_payload,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Customers  ----------------------------------------------------
route!(upsert_customer => Post "/customer/create" impl MealPlanDatabase);
/// Registers a customer. Returns `201 Created` for a new customer, and `200 OK` with the stored record if the
/// WhatsApp number is already registered. The stored delivery address is never overwritten.
pub async fn upsert_customer<B: MealPlanDatabase>(
    body: web::Json<CustomerRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST create customer for {}", req.whatsapp_number);
    let (customer, created) = api.upsert_customer(&req.whatsapp_number, &req.delivery_address).await?;
    if created {
        Ok(HttpResponse::Created().json(DataResponse::new(customer).with_message("Customer created successfully")))
    } else {
        Ok(HttpResponse::Ok().json(DataResponse::new(customer).with_message("Customer already exists")))
    }
}

route!(customers_count => Get "/customer/customersCount" impl MealPlanDatabase);
pub async fn customers_count<B: MealPlanDatabase>(
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let count = api.customer_count().await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(CustomerCount { count })))
}

//----------------------------------------------   Menus  ----------------------------------------------------
route!(publish_menu => Post "/menu/add" impl MealPlanDatabase, Notifier);
/// Publishes a menu and sends it to every active subscriber for that meal.
///
/// Under the strict gating policy, the menu is not saved if not one subscriber could be notified, and the response
/// is a retryable 500.
pub async fn publish_menu<B, N>(
    body: web::Json<MenuRequest>,
    api: web::Data<MenuApi<B, N>>,
) -> Result<HttpResponse, ServerError>
where
    B: MealPlanDatabase,
    N: Notifier,
{
    let req = body.into_inner();
    debug!("💻️ POST publish {} menu for {}", req.menu_type, req.menu_date);
    let published = api.publish_menu(req.into()).await?;
    let message = format!(
        "Menu for {} on {} created. {} of {} subscribers notified",
        published.menu.menu_type, published.menu.menu_date, published.notified_count, published.total_eligible
    );
    Ok(HttpResponse::Created().json(DataResponse::new(published).with_message(message)))
}

route!(todays_menu => Get "/menu/today" impl MealPlanDatabase, Notifier);
pub async fn todays_menu<B, N>(
    query: web::Query<MenuQuery>,
    api: web::Data<MenuApi<B, N>>,
) -> Result<HttpResponse, ServerError>
where
    B: MealPlanDatabase,
    N: Notifier,
{
    let menu_type = query
        .menu_type
        .as_deref()
        .ok_or_else(|| ServerError::InvalidQuery("menuType is required. It must be lunch or dinner".into()))
        .and_then(|s| MealType::from_str(s).map_err(|e| ServerError::InvalidQuery(e.to_string())))?;
    trace!("💻️ GET today's {menu_type} menu");
    let menu = api.todays_menu(menu_type).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(menu)))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(place_order => Post "/order/createOrder" impl MealPlanDatabase, Notifier, PaymentVerifier);
/// Places an order without payment confirmation. The order is stored with a pending payment status.
pub async fn place_order<B, N, V>(
    body: web::Json<OrderRequest>,
    api: web::Data<OrderFlowApi<B, N, V>>,
) -> Result<HttpResponse, ServerError>
where
    B: MealPlanDatabase,
    N: Notifier,
    V: PaymentVerifier,
{
    let req = PlaceOrderRequest::from(body.into_inner());
    debug!("💻️ POST new order for {}: {} {} meals", req.whatsapp_number, req.meal_quantity, req.meal_split);
    let order = api.place_order(req).await.map_err(|e| {
        debug!("💻️ Order was not placed. {e}");
        e
    })?;
    Ok(HttpResponse::Created().json(DataResponse::new(order)))
}

route!(verify_payment => Post "/payment/verify" impl MealPlanDatabase, Notifier, PaymentVerifier);
/// Checks a Razorpay checkout signature and, if it is genuine, places the order with a successful payment status.
/// A bad signature is a 400 and nothing is stored.
pub async fn verify_payment<B, N, V>(
    body: web::Json<PaymentVerificationRequest>,
    api: web::Data<OrderFlowApi<B, N, V>>,
) -> Result<HttpResponse, ServerError>
where
    B: MealPlanDatabase,
    N: Notifier,
    V: PaymentVerifier,
{
    let req = PlaceOrderRequest::from(body.into_inner());
    debug!("💻️ POST verify payment for {}", req.whatsapp_number);
    let order = api.place_order(req).await.map_err(|e| {
        debug!("💻️ Paid order was not placed. {e}");
        e
    })?;
    Ok(HttpResponse::Created().json(DataResponse::new(order).with_message("Payment verified and order placed")))
}

route!(todays_orders => Get "/order/today" impl MealPlanDatabase);
pub async fn todays_orders<B: MealPlanDatabase>(api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError> {
    let orders = api.orders_placed_today().await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(orders)))
}

route!(all_orders => Get "/order/allOrders" impl MealPlanDatabase);
pub async fn all_orders<B: MealPlanDatabase>(api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError> {
    let orders = api.search_orders(OrderQueryFilter::default()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(orders)))
}

route!(update_order_status => Patch "/order/{id}/status" impl MealPlanDatabase);
pub async fn update_order_status<B: MealPlanDatabase>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdate<OrderStatus>>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ PATCH order #{id} status to {status}");
    let order = api.update_order_status(id, status).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(order)))
}

//----------------------------------------------   Deliveries  ----------------------------------------------------
route!(todays_deliveries => Get "/delivery/today" impl MealPlanDatabase);
pub async fn todays_deliveries<B: MealPlanDatabase>(
    api: web::Data<DeliveryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let deliveries = api.todays_deliveries().await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(deliveries)))
}

route!(update_delivery_status => Patch "/delivery/{id}/status" impl MealPlanDatabase);
pub async fn update_delivery_status<B: MealPlanDatabase>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdate<DeliveryStatus>>,
    api: web::Data<DeliveryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ PATCH delivery #{id} status to {status}");
    let delivery = api.update_delivery_status(id, status).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(delivery)))
}

//----------------------------------------------   WhatsApp  ----------------------------------------------------
/// The webhook subscription handshake. Meta sends our verification token and expects the challenge echoed back.
#[get("/whatsapp/webhook")]
pub async fn verify_webhook(
    query: web::Query<WebhookVerification>,
    config: web::Data<WebhookConfig>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    let token = query.verify_token.as_deref().unwrap_or_default();
    match (query.mode.as_deref(), query.challenge) {
        (Some("subscribe"), Some(challenge)) if config.accepts_verify_token(token) => {
            info!("💬️ Webhook subscription verified");
            Ok(HttpResponse::Ok().content_type("text/plain").body(challenge))
        },
        _ => {
            warn!("💬️ Webhook verification request was refused");
            Err(ServerError::Forbidden("Webhook verification failed.".into()))
        },
    }
}

route!(whatsapp_webhook => Post "" impl MealPlanDatabase);
/// Receives customer replies from WhatsApp.
///
/// The response is always `200 OK`, whatever happens to the payload. WhatsApp retries anything else, and a retry
/// will not fix a message we could not process.
pub async fn whatsapp_webhook<B: MealPlanDatabase>(body: web::Bytes, api: web::Data<ReplyApi<B>>) -> HttpResponse {
    trace!("💬️ Received webhook call ({} bytes)", body.len());
    let payload = match serde_json::from_slice::<WebhookPayload>(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("💬️ Could not parse webhook payload. {e}");
            return HttpResponse::Ok().json(JsonResponse::failure("Unrecognised payload"));
        },
    };
    let replies = replies_from_payload(payload);
    let count = replies.len();
    let mut scheduled = 0;
    for reply in replies {
        match api.handle_inbound_reply(reply).await {
            ReplyOutcome::DeliveryScheduled { .. } => scheduled += 1,
            ReplyOutcome::Failed(e) => warn!("💬️ A webhook reply could not be processed. {e}"),
            outcome => trace!("💬️ Reply outcome: {outcome:?}"),
        }
    }
    debug!("💬️ Webhook processed {count} messages. {scheduled} deliveries scheduled");
    HttpResponse::Ok().json(JsonResponse::success(format!("{count} messages received")))
}

route!(inbound_messages => Get "/whatsapp/responses" impl MealPlanDatabase);
pub async fn inbound_messages<B: MealPlanDatabase>(
    query: web::Query<InboxQuery>,
    api: web::Data<ReplyApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let messages = api.inbound_messages(query.limit).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(messages)))
}

route!(send_message => Post "/whatsapp/send" impl Notifier);
/// Sends a one-off text message. Delivery is best effort, so the response is `202 Accepted` once the request has
/// been handed to the provider.
pub async fn send_message<N: Notifier>(
    body: web::Json<FreeformMessage>,
    notifier: web::Data<N>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    if req.message.trim().is_empty() {
        return Err(ServerError::ValidationError("A message is required".into()));
    }
    let number = normalize_whatsapp_number(&req.whatsapp_number)?;
    debug!("💻️ POST freeform message to {number}");
    notifier.send_freeform(&number, req.message.trim()).await;
    Ok(HttpResponse::Accepted().json(JsonResponse::success(format!("Message to {number} accepted"))))
}
