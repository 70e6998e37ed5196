//! Shared fakes for the pipeline integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::panic)]

use async_trait::async_trait;
use curata_core::{Counter, CounterStore, Translator, User, UserDirectory};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// User directory backed by a map keyed on lowercase email
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, User>,
    pub fail: bool,
}

impl InMemoryUserDirectory {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|u| (u.email.to_lowercase(), u))
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            users: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> curata_core::Result<Option<User>> {
        if self.fail {
            return Err(curata_core::Error::Directory("directory offline".into()));
        }
        Ok(self.users.get(&email.to_lowercase()).cloned())
    }
}

pub fn user(username: &str, email: &str) -> User {
    User {
        username: username.to_string(),
        email: email.to_string(),
        roles: vec![],
    }
}

/// Counter store backed by a mutex-guarded map
#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<(String, String), i64>>,
}

impl InMemoryCounterStore {
    pub fn value(&self, name: &str, branding: &str) -> Option<i64> {
        self.counters
            .lock()
            .unwrap()
            .get(&(name.to_string(), branding.to_string()))
            .copied()
    }

    pub fn seed(&self, name: &str, branding: &str, value: i64) {
        self.counters
            .lock()
            .unwrap()
            .insert((name.to_string(), branding.to_string()), value);
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn find_or_create(&self, name: &str, branding: &str) -> curata_core::Result<Counter> {
        let mut counters = self.counters.lock().unwrap();
        let value = *counters
            .entry((name.to_string(), branding.to_string()))
            .or_insert(0);
        Ok(Counter {
            name: name.to_string(),
            branding: branding.to_string(),
            value,
        })
    }

    async fn update_value(&self, name: &str, branding: &str, value: i64) -> curata_core::Result<()> {
        self.counters
            .lock()
            .unwrap()
            .insert((name.to_string(), branding.to_string()), value);
        Ok(())
    }
}

/// Translator returning canned text, or the key itself when unmapped
#[derive(Default)]
pub struct StaticTranslator {
    entries: HashMap<String, String>,
}

impl StaticTranslator {
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Translator for StaticTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Ordered log of hook invocations, shared between spies and assertions
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
