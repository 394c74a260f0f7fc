use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use crate::{db_types::MealType, traits::Notifier};

/// A [`Notifier`] that records what it was asked to send, and fails for the addresses it is told to.
#[derive(Clone, Debug, Default)]
pub struct ScriptedNotifier {
    offline: bool,
    failing: HashSet<String>,
    templates: Arc<Mutex<Vec<(String, MealType, String)>>>,
    texts: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedNotifier {
    /// A notifier for which every send fails.
    pub fn offline() -> Self {
        Self { offline: true, ..Default::default() }
    }

    pub fn failing_for(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    /// Templates the provider accepted, in the order they were sent.
    pub fn sent_templates(&self) -> Vec<(String, MealType, String)> {
        self.templates.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn sent_texts(&self) -> Vec<(String, String)> {
        self.texts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn accepts(&self, address: &str) -> bool {
        !self.offline && !self.failing.contains(address)
    }
}

impl Notifier for ScriptedNotifier {
    async fn send_template(&self, address: &str, meal_type: MealType, items: &str) -> bool {
        if !self.accepts(address) {
            return false;
        }
        if let Ok(mut templates) = self.templates.lock() {
            templates.push((address.to_string(), meal_type, items.to_string()));
        }
        true
    }

    async fn send_freeform(&self, address: &str, message: &str) {
        if self.accepts(address) {
            if let Ok(mut texts) = self.texts.lock() {
                texts.push((address.to_string(), message.to_string()));
            }
        }
    }
}
