//! Spoor Storage - Local durable key-value persistence
//!
//! Provides `FileKeyValueStore`, the file-backed implementation of the
//! `IKeyValueStore` port. It holds the few values that must survive
//! restarts: the consent decision and the anonymous user id.

pub mod file_store;

pub use file_store::FileKeyValueStore;
