//! Local key-value storage port (driven/secondary port)
//!
//! String-valued durable storage for the handful of values that must
//! survive restarts: the consent decision and the anonymous user id.
//! Operations are synchronous because implementations are local
//! (a small file, an in-memory map in tests).

/// Storage key for the persisted consent decision.
pub const CONSENT_KEY: &str = "analytics_consent";

/// Storage key for the persisted anonymous user id.
pub const USER_ID_KEY: &str = "anon_user_id";

/// Port trait for durable local key-value storage.
pub trait IKeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove a key; removing an absent key is not an error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}
