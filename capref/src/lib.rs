//! # capref
//!
//! Capability-checked component references for entity/component scenes.
//!
//! A component often needs to point at "any component that can do X" rather
//! than at one concrete type. [`Verifier<T>`] stores such a reference in
//! serializable form (entity plus component ID) and checks it against the
//! [`Scene`] on every resolution, so a reference that was retargeted, had its
//! component swapped, or outlived its target degrades to `None` instead of
//! lying. [`VerifierGroup<T>`] does the same for an ordered list, with a
//! version-stamped cast cache for hot loops.
//!
//! ## Core Types
//!
//! - [`Entity`] — Lightweight generational entity identifier
//! - [`Scene`] — Container owning entities and their boxed components
//! - [`Component`] — Object-safe trait all components implement (derivable)
//! - [`CapabilityRegistry`] — Capability casters per component type
//! - [`Verifier`] — One checked reference to a capability implementor
//! - [`VerifierGroup`] — Ordered verifiers with a version-stamped cast cache
//! - [`AssignTarget`] / [`resolve_target`] — The drop resolution rule
//! - [`Diagnostic`] / [`DiagnosticSink`] — Structured validation reporting
//!
//! ## Editor UI
//!
//! The [`ui`] module renders the scene tree and verifier drop slots with
//! egui: drag a component or entity row onto a slot, get blue/red validity
//! feedback while hovering, and an error annotation when a stored reference
//! stops satisfying its capability.
//!
//! ## Deriving components
//!
//! ```ignore
//! #[derive(Component)]
//! #[provides(Damageable)]
//! struct Turret {
//!     hp: i32,
//! }
//! ```
//!
//! `#[provides(...)]` registers a caster for each listed capability trait, so
//! `scene.capability::<dyn Damageable>(reference)` can reach a `Turret`
//! through `&dyn Component`.
//!
//! See `DESIGN.md` in this crate for architecture decisions and goals.

mod capability;
pub mod component;
mod diagnostics;
mod entity;
mod group;
pub mod inspect;
mod resolve;
mod scene;
pub mod serialize;
#[cfg(test)]
mod test_support;
pub mod ui;
mod verifier;

pub use capability::{CapabilityCaster, CapabilityRegistry, capability_name};
pub use capref_macro::Component;
pub use component::{Component, Name};
pub use diagnostics::{CaptureSink, Diagnostic, DiagnosticSink, LogSink};
pub use entity::Entity;
pub use group::{ResolvedCapability, VerifierGroup};
pub use resolve::{AssignTarget, resolve_target};
pub use scene::{ComponentId, ComponentRef, Scene};
pub use verifier::Verifier;
