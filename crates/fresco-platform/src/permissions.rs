//! Photo-library permission gate.

use std::sync::Mutex;

/// Outcome of a permission check or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// Access is granted.
    Granted,
    /// Access is denied.
    Denied,
    /// The user has not been asked yet; `request` resolves it.
    Undetermined,
}

/// Gate guarding access to the user's photo library / pictures directory.
pub trait PermissionGate: Send + Sync {
    /// Returns the current permission state without prompting.
    fn check(&self) -> PermissionState;

    /// Requests access, resolving an undetermined state. One round-trip.
    fn request(&self) -> PermissionState;
}

/// Gate for hosts where the process's own filesystem rights are the only
/// barrier; always granted.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenPermissionGate;

impl OpenPermissionGate {
    /// Builds the always-granting gate.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PermissionGate for OpenPermissionGate {
    fn check(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn request(&self) -> PermissionState {
        PermissionState::Granted
    }
}

/// Gate with a scripted answer, for deployments that pre-authorise and for
/// tests exercising denial paths.
#[derive(Debug)]
pub struct StaticPermissionGate {
    check_state: Mutex<PermissionState>,
    request_answer: PermissionState,
}

impl StaticPermissionGate {
    /// Builds a gate that reports `state` from both `check` and `request`.
    #[must_use]
    pub const fn new(state: PermissionState) -> Self {
        Self {
            check_state: Mutex::new(state),
            request_answer: state,
        }
    }

    /// Builds a gate that is undetermined until `request`, which answers
    /// `answer` and latches it.
    #[must_use]
    pub const fn undetermined_then(answer: PermissionState) -> Self {
        Self {
            check_state: Mutex::new(PermissionState::Undetermined),
            request_answer: answer,
        }
    }
}

impl PermissionGate for StaticPermissionGate {
    fn check(&self) -> PermissionState {
        self.check_state
            .lock()
            .map_or(PermissionState::Denied, |state| *state)
    }

    fn request(&self) -> PermissionState {
        if let Ok(mut state) = self.check_state.lock() {
            *state = self.request_answer;
        }
        self.request_answer
    }
}
