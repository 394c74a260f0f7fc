use cucumber::{given, then, when};
use meal_plan_engine::{
    db_types::{MealSplit, MealType, NewCustomer, NewMenu, NewOrder, OrderStatus, Rupees},
    helpers::today,
    order_objects::{OrderQueryFilter, PaymentProof, PlaceOrderRequest},
    reply_objects::{InboundReply, ReplyOutcome},
    AccountApi,
    CustomerManagement,
    DeliveryApi,
    GatingPolicy,
    MealPlanError,
    MenuApi,
    OrderFlowApi,
    OrderManagement,
    PaymentVerifier,
    ReplyApi,
};

use crate::cucumber::MealPlanWorld;

struct AcceptAll;

impl PaymentVerifier for AcceptAll {
    fn verify(&self, _proof: &PaymentProof) -> bool {
        true
    }
}

fn items(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).collect()
}

#[given(expr = "customer {word} has an active {word} order for {int} meals")]
async fn customer_with_order(world: &mut MealPlanWorld, number: String, split: String, meals: i64) {
    let db = world.db();
    let (customer, _) = db.insert_customer(NewCustomer::new(number, "1 Temple Street")).await.expect("customer");
    let split = split.parse::<MealSplit>().expect("meal split");
    db.insert_order(NewOrder::new(customer.id, meals, split, Rupees::from(100 * meals))).await.expect("order");
}

#[given(expr = "the {word} menu {string} is published at {int} rupees")]
async fn menu_exists(world: &mut MealPlanWorld, meal_type: String, list: String, rate: i64) {
    do_publish_menu(world, meal_type, list, rate).await;
    assert!(world.last_error.is_none(), "Menu publication failed: {:?}", world.last_error);
}

#[when(expr = "I publish the {word} menu {string} at {int} rupees")]
async fn publish_menu(world: &mut MealPlanWorld, meal_type: String, list: String, rate: i64) {
    do_publish_menu(world, meal_type, list, rate).await;
}

async fn do_publish_menu(world: &mut MealPlanWorld, meal_type: String, list: String, rate: i64) {
    let meal_type = meal_type.parse::<MealType>().expect("meal type");
    let api = MenuApi::new(world.db(), world.notifier(), GatingPolicy::Strict);
    let menu = NewMenu::new(meal_type, today(), items(&list), Rupees::from(rate));
    match api.publish_menu(menu).await {
        Ok(published) => {
            world.last_published = Some(published);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "{word} orders {int} {word} meals for {int} rupees")]
async fn place_order(world: &mut MealPlanWorld, number: String, meals: i64, split: String, total: i64) {
    do_place_order(world, number, meals, split, total, "1 Temple Street".to_string()).await;
}

#[when(expr = "{word} orders {int} {word} meals for {int} rupees to be delivered to {string}")]
async fn place_order_to_address(
    world: &mut MealPlanWorld,
    number: String,
    meals: i64,
    split: String,
    total: i64,
    address: String,
) {
    do_place_order(world, number, meals, split, total, address).await;
}

async fn do_place_order(
    world: &mut MealPlanWorld,
    number: String,
    meals: i64,
    split: String,
    total: i64,
    address: String,
) {
    let split = split.parse::<MealSplit>().expect("meal split");
    let api = OrderFlowApi::new(world.db(), world.notifier(), AcceptAll, GatingPolicy::Strict);
    let request = PlaceOrderRequest::new(number, meals, split, Rupees::from(total)).with_delivery_address(address);
    match api.place_order(request).await {
        Ok(_) => world.last_error = None,
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "{word} replies {string}")]
async fn reply(world: &mut MealPlanWorld, number: String, text: String) {
    let api = ReplyApi::new(world.db());
    world.last_reply = Some(api.handle_inbound_reply(InboundReply::text(number, text)).await);
}

#[when(expr = "{word} replies {string} in message {word}")]
async fn reply_with_id(world: &mut MealPlanWorld, number: String, text: String, message_id: String) {
    let api = ReplyApi::new(world.db());
    let reply = InboundReply::text(number, text).with_message_id(message_id);
    world.last_reply = Some(api.handle_inbound_reply(reply).await);
}

#[then(expr = "{int} of {int} subscribers are notified")]
async fn notified(world: &mut MealPlanWorld, notified_count: usize, eligible: usize) {
    let published = world.last_published.as_ref().expect("No menu was published");
    assert_eq!(published.notified_count, notified_count);
    assert_eq!(published.total_eligible, eligible);
}

#[then(expr = "{word} received the {word} menu")]
async fn received_menu(world: &mut MealPlanWorld, number: String, meal_type: String) {
    let meal_type = meal_type.parse::<MealType>().expect("meal type");
    let sent = world.notifier().sent();
    assert!(sent.contains(&(number.clone(), meal_type)), "{number} did not receive the {meal_type} menu: {sent:?}");
}

#[then(expr = "{word} did not receive the {word} menu")]
async fn did_not_receive_menu(world: &mut MealPlanWorld, number: String, meal_type: String) {
    let meal_type = meal_type.parse::<MealType>().expect("meal type");
    assert!(!world.notifier().sent().contains(&(number, meal_type)));
}

#[then("the request fails and can be retried")]
async fn retryable_failure(world: &mut MealPlanWorld) {
    let err = world.last_error.as_ref().expect("Expected the request to fail");
    assert!(err.is_retryable(), "Expected a retryable error, got {err}");
}

#[then(expr = "the request fails because the {word} menu is missing")]
async fn missing_menu(world: &mut MealPlanWorld, meal_type: String) {
    let expected = meal_type.parse::<MealType>().expect("meal type");
    match world.last_error.as_ref() {
        Some(MealPlanError::MenuNotFound { meal_type, .. }) => assert_eq!(*meal_type, expected),
        other => panic!("Expected a missing menu error, got {other:?}"),
    }
}

#[then(expr = "no {word} menu exists for today")]
async fn no_menu(world: &mut MealPlanWorld, meal_type: String) {
    let meal_type = meal_type.parse::<MealType>().expect("meal type");
    let api = MenuApi::new(world.db(), world.notifier(), GatingPolicy::Strict);
    assert!(api.todays_menu(meal_type).await.is_err());
}

#[then(expr = "a delivery is scheduled with {int} meals remaining")]
async fn delivery_scheduled(world: &mut MealPlanWorld, remaining: i64) {
    match world.last_reply.as_ref() {
        Some(ReplyOutcome::DeliveryScheduled { meals_remaining, .. }) => assert_eq!(*meals_remaining, remaining),
        other => panic!("Expected a scheduled delivery, got {other:?}"),
    }
}

#[then("no delivery is scheduled")]
async fn no_delivery(world: &mut MealPlanWorld) {
    let outcome = world.last_reply.as_ref().expect("No reply was processed");
    assert!(!outcome.is_delivery_scheduled(), "Unexpected delivery: {outcome:?}");
}

#[then(expr = "the reply is ignored as a duplicate")]
async fn duplicate(world: &mut MealPlanWorld) {
    assert!(matches!(world.last_reply, Some(ReplyOutcome::Duplicate)));
}

#[then(expr = "{word} has {int} meals left on an order that is {word}")]
async fn meals_left(world: &mut MealPlanWorld, number: String, meals: i64, status: String) {
    let status = status.parse::<OrderStatus>().expect("order status");
    let db = world.db();
    let customer = db.fetch_customer_by_number(&number).await.expect("db").expect("customer");
    let api = AccountApi::new(db);
    let orders = api
        .search_orders(OrderQueryFilter::default().with_customer_id(customer.id))
        .await
        .expect("orders");
    let latest = &orders.first().expect("The customer has no orders").order;
    assert_eq!(latest.meal_quantity, meals);
    assert_eq!(latest.order_status, status);
}

#[then(expr = "{word} has {int} deliveries to {string} confirmed with {string}")]
async fn confirmed_deliveries(
    world: &mut MealPlanWorld,
    number: String,
    count: usize,
    address: String,
    response: String,
) {
    let db = world.db();
    let customer = db.fetch_customer_by_number(&number).await.expect("db").expect("customer");
    assert_eq!(customer.delivery_address, address);
    let orders = db.search_orders(OrderQueryFilter::default().with_customer_id(customer.id)).await.expect("orders");
    let latest = orders.first().expect("The customer has no orders");
    assert_eq!(latest.deliveries.len(), count);
    assert!(latest.deliveries.iter().all(|d| d.customer_response == response && d.delivery_date == today()));
}

#[then(expr = "there are {int} deliveries for today")]
async fn deliveries_today(world: &mut MealPlanWorld, count: usize) {
    let api = DeliveryApi::new(world.db());
    assert_eq!(api.todays_deliveries().await.expect("deliveries").len(), count);
}

#[then(expr = "there are {int} customers")]
async fn customer_count(world: &mut MealPlanWorld, count: i64) {
    let api = AccountApi::new(world.db());
    assert_eq!(api.customer_count().await.expect("count"), count);
}

#[then(expr = "there are {int} orders")]
async fn order_count(world: &mut MealPlanWorld, count: usize) {
    let orders = world.db().search_orders(Default::default()).await.expect("orders");
    assert_eq!(orders.len(), count);
}
