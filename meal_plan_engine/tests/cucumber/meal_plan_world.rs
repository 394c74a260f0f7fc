use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
    Mutex,
};

use cucumber::World;
use log::*;
use meal_plan_engine::{
    db_types::MealType,
    menu_objects::PublishedMenu,
    reply_objects::ReplyOutcome,
    MealPlanError,
    Notifier,
    SqliteDatabase,
};

#[derive(Default, Debug, World)]
pub struct MealPlanWorld {
    pub system: Option<MealPlanSystem>,
    pub last_published: Option<PublishedMenu>,
    pub last_reply: Option<ReplyOutcome>,
    pub last_error: Option<MealPlanError>,
}

impl MealPlanWorld {
    pub fn system(&self) -> &MealPlanSystem {
        self.system.as_ref().expect("The meal plan system has not been initialised")
    }

    pub fn db(&self) -> SqliteDatabase {
        self.system().db.clone()
    }

    pub fn notifier(&self) -> RecordingNotifier {
        self.system().notifier.clone()
    }
}

#[derive(Debug)]
pub struct MealPlanSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub notifier: RecordingNotifier,
}

impl MealPlanSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        db.run_migrations().await.expect("Error running DB migrations");
        debug!("Created database: {url}");
        Self { db_path: url, db, notifier: RecordingNotifier::default() }
    }
}

fn random_db_path() -> String {
    format!("sqlite://{}/meals_cucumber_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

/// Accepts every message until it is taken offline.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    offline: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<(String, MealType)>>>,
}

impl RecordingNotifier {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, MealType)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send_template(&self, address: &str, meal_type: MealType, _items: &str) -> bool {
        if self.offline.load(Ordering::SeqCst) {
            return false;
        }
        self.sent.lock().unwrap().push((address.to_string(), meal_type));
        true
    }

    async fn send_freeform(&self, _address: &str, _message: &str) {}
}
