//! Spoor Agent - Consent-gated instrumentation runtime
//!
//! Provides:
//! - `SignalBus`: declarative (signal, handler) registration the host
//!   application emits navigation/click/error/rejection signals into
//! - `Console`: an explicit console facade whose error/warn calls can be
//!   tapped by the interceptor and always reach the original writers
//! - `Interceptor`: the two-state machine that installs all interception
//!   atomically while consent is granted and reverses it symmetrically on
//!   teardown
//! - `ConsentGate`: the persisted three-state consent flag driving
//!   interceptor activation

pub mod bus;
pub mod console;
pub mod consent;
pub mod interceptor;

pub use bus::{ElementRef, HostSignal, ISignalHandler, SignalBus, SignalKind, SubscriptionId};
pub use console::{serialize_args, Console, ConsoleLevel, IConsoleTap, TapToken};
pub use consent::ConsentGate;
pub use interceptor::{Interceptor, TRACKING_ATTRIBUTE, TRACKING_LABEL_ATTRIBUTE};
