//! Capability traits for the pipeline's collaborators
//!
//! The trigger pipeline never talks to storage, directories or translation
//! catalogs directly; it consumes them through these interfaces. Implementers
//! live in the surrounding record-management service (or in test fakes).
//!
//! Async capabilities use `async-trait` so they stay object-safe behind
//! `Arc<dyn ...>`.

use crate::error::Result;
use crate::record::{Record, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persistence of record state, not implemented by this library
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the record identified by `oid`
    async fn read(&self, oid: &str) -> Result<Record>;

    /// Persist `record` under `oid`, returning the stored state
    async fn write(&self, oid: &str, record: Record) -> Result<Record>;
}

/// Lookup of user accounts by email
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find the account owning `email`, matched case-insensitively
    ///
    /// `Ok(None)` means no such account (the contributor stays pending);
    /// `Err` means the directory itself is unreachable and is fatal to the
    /// enclosing save.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// A persisted global counter, uniquely identified by `(name, branding)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// Counter name, normally the metadata field it feeds
    pub name: String,

    /// Branding id scoping the counter
    pub branding: String,

    /// Current value
    pub value: i64,
}

/// Persistence of global counters
///
/// The increment is a two-step read-modify-write by construction: the
/// pipeline calls [`find_or_create`](CounterStore::find_or_create) for every
/// configured counter first, then [`update_value`](CounterStore::update_value)
/// with the incremented values. Callers that need stronger guarantees must
/// serialize concurrent increments for the same `(name, branding)` pair.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Fetch the counter, creating it with value `0` on first reference
    async fn find_or_create(&self, name: &str, branding: &str) -> Result<Counter>;

    /// Persist a new value for the counter
    async fn update_value(&self, name: &str, branding: &str, value: i64) -> Result<()>;
}

/// Translation-key lookup for counter prefixes
pub trait Translator: Send + Sync {
    /// Resolve `key` to localized text
    fn translate(&self, key: &str) -> String;
}

/// Boolean gate controlling whether a conditional hook runs
pub trait TriggerCondition: Send + Sync {
    /// Evaluate the condition against the event
    fn evaluate(&self, oid: &str, record: &Record, options: &Value) -> bool;
}
