//! Authoring-time diagnostics for verified references.
//!
//! Nothing in this crate raises when a reference goes bad: invalid verifiers
//! are reported through an explicitly passed [`DiagnosticSink`] and skipped.
//! An unset or mis-typed reference is an expected, recoverable authoring
//! state, not a program fault.
//!
//! [`LogSink`] routes reports to the `log` facade; [`CaptureSink`] collects
//! them for assertions and tooling.

use std::fmt;

use parking_lot::Mutex;

use crate::entity::Entity;

// ---------------------------------------------------------------------------
// Diagnostic conditions
// ---------------------------------------------------------------------------

/// A single detected invalidity. All conditions are non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A group sweep or cache rebuild found an invalid verifier.
    ///
    /// `component` is `None` when the verifier had no reference assigned (or
    /// the referenced target no longer exists), and the referenced
    /// component's name when it exists but does not satisfy the capability.
    InvalidReference {
        index: usize,
        component: Option<&'static str>,
        capability: &'static str,
    },
    /// A dropped component was rejected because it does not satisfy the
    /// capability (stale references reject the same way).
    ComponentMismatch {
        component: &'static str,
        capability: &'static str,
    },
    /// A dropped entity was rejected because none of its components satisfy
    /// the capability.
    NoSatisfyingComponent {
        entity: Entity,
        capability: &'static str,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidReference {
                index,
                component: None,
                capability,
            } => {
                write!(
                    f,
                    "Verifier {index}: no reference assigned for capability '{capability}'"
                )
            }
            Diagnostic::InvalidReference {
                index,
                component: Some(component),
                capability,
            } => {
                write!(
                    f,
                    "Verifier {index}: '{component}' does not implement '{capability}'"
                )
            }
            Diagnostic::ComponentMismatch {
                component,
                capability,
            } => {
                write!(f, "'{component}' does not implement '{capability}'")
            }
            Diagnostic::NoSatisfyingComponent { entity, capability } => {
                write!(f, "No component on {entity} implements '{capability}'")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receiver for diagnostics.
///
/// Passed explicitly to every operation that can detect an invalidity, so the
/// reporting dependency is visible and swappable in tests.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Routes diagnostics to the `log` facade.
///
/// Sweep findings are errors (a committed group element is broken); rejected
/// drops are warnings (the assignment simply did not happen).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::InvalidReference { .. } => log::error!("{diagnostic}"),
            Diagnostic::ComponentMismatch { .. } | Diagnostic::NoSatisfyingComponent { .. } => {
                log::warn!("{diagnostic}")
            }
        }
    }
}

/// Collects diagnostics in order, for assertions and tooling.
#[derive(Default)]
pub struct CaptureSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything reported so far, oldest first.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().is_empty()
    }
}

impl DiagnosticSink for CaptureSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}
