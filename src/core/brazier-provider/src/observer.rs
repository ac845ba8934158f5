//! Operation outcome notification.
//!
//! Every funneled provider operation reports `(operation, success)` exactly
//! once through a [`ProviderObserver`]. Callers cannot distinguish failure
//! kinds from return values alone; the observer channel is the diagnostic
//! surface.

use std::sync::Mutex;

/// The provider operations that report outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Public key and address retrieval.
    GetAccountInfo,
    /// Raw transaction signing.
    SignTransaction,
    /// `personal_sign` message signing.
    SignPersonalMessage,
    /// EIP-712 typed-data signing.
    SignTypedData,
    /// Record password rotation.
    UpdatePin,
    /// Record removal.
    Clean,
}

impl Operation {
    /// Stable operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAccountInfo => "get_account_info",
            Operation::SignTransaction => "sign_transaction",
            Operation::SignPersonalMessage => "sign_personal_message",
            Operation::SignTypedData => "sign_typed_data",
            Operation::UpdatePin => "update_pin",
            Operation::Clean => "clean",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives operation outcome notifications.
pub trait ProviderObserver: Send + Sync {
    /// Called once per funneled operation with its outcome.
    fn on_operation(&self, operation: Operation, success: bool);
}

/// Observer that discards all notifications.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ProviderObserver for NoopObserver {
    fn on_operation(&self, _operation: Operation, _success: bool) {}
}

/// Observer that records notifications in order, for tests and tooling.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(Operation, bool)>>,
}

impl RecordingObserver {
    /// Creates an empty recording observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far, in order.
    pub fn events(&self) -> Vec<(Operation, bool)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// The most recent notification, if any.
    pub fn last(&self) -> Option<(Operation, bool)> {
        self.events().last().copied()
    }
}

impl ProviderObserver for RecordingObserver {
    fn on_operation(&self, operation: Operation, success: bool) {
        if let Ok(mut events) = self.events.lock() {
            events.push((operation, success));
        }
    }
}
