//! Spoor Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Breadcrumb`, `BreadcrumbTrail`, `ConsentState`,
//!   `TrackedEvent`, `CapturedError`, `ErrorRecord`
//! - **Use cases** - `EventTracker`, `ErrorReporter`
//! - **Port definitions** - Traits for adapters: `IAnalyticsSink`,
//!   `ISessionReplay`, `IErrorStore`, `IKeyValueStore`
//! - **Identity** - `SessionIdentityProvider` for the anonymous user id and
//!   the per-process session id
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod identity;
pub mod ports;
pub mod usecases;
