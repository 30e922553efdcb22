//! The leaf wrapper: one stored reference, verified against one capability.

use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::diagnostics::DiagnosticSink;
use crate::resolve::{AssignTarget, resolve_target};
use crate::scene::{ComponentRef, Scene};

/// A single component reference that promises, but does not enforce, that its
/// target satisfies capability `T`.
///
/// The stored reference may be absent, stale, or point at a component of the
/// wrong type; all of those are representable, detectable states rather than
/// errors. Validity is re-evaluated on every query and never cached here,
/// because the inspector can rewrite the reference at any time.
///
/// Serialization persists only the reference, so a verifier embedded in a
/// saved component survives round-trips without constraining `T`.
pub struct Verifier<T: ?Sized> {
    reference: Option<ComponentRef>,
    marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized + 'static> Verifier<T> {
    /// Creates a verifier with no reference.
    pub fn new() -> Self {
        Self {
            reference: None,
            marker: PhantomData,
        }
    }

    /// Creates a verifier seeded with a reference.
    ///
    /// The reference is not validated here; an incompatible seed simply makes
    /// [`is_valid`](Self::is_valid) false.
    pub fn with_reference(reference: ComponentRef) -> Self {
        Self {
            reference: Some(reference),
            marker: PhantomData,
        }
    }

    /// The stored reference, if any.
    pub fn reference(&self) -> Option<ComponentRef> {
        self.reference
    }

    /// Replaces the stored reference without validation.
    pub fn set_reference(&mut self, reference: Option<ComponentRef>) {
        self.reference = reference;
    }

    /// Clears the stored reference.
    pub fn clear(&mut self) {
        self.reference = None;
    }

    /// Returns whether the stored reference currently satisfies `T`.
    ///
    /// `false` when the reference is absent, when its target despawned or
    /// detached, and when the target's type does not provide `T`. Pure
    /// query: no diagnostics, no side effects.
    pub fn is_valid(&self, scene: &Scene) -> bool {
        self.reference
            .is_some_and(|reference| scene.satisfies::<T>(reference))
    }

    /// Resolves the stored reference as capability `T`.
    ///
    /// `None` exactly when [`is_valid`](Self::is_valid) is `false`.
    pub fn resolve<'a>(&self, scene: &'a Scene) -> Option<&'a T> {
        self.reference
            .and_then(|reference| scene.capability::<T>(reference))
    }

    /// Mutable variant of [`resolve`](Self::resolve).
    pub fn resolve_mut<'a>(&self, scene: &'a mut Scene) -> Option<&'a mut T> {
        self.reference
            .and_then(|reference| scene.capability_mut::<T>(reference))
    }

    /// Applies a drop/assignment coming from the inspector.
    ///
    /// `None` clears the reference. A target that resolves under the
    /// [resolution rule](crate::resolve::resolve_target) replaces the
    /// reference; a rejected target reports through `sink`, leaves the
    /// previously stored reference untouched, and returns `false`.
    pub fn apply_assignment(
        &mut self,
        scene: &Scene,
        target: Option<AssignTarget>,
        sink: &dyn DiagnosticSink,
    ) -> bool {
        match target {
            None => {
                self.reference = None;
                true
            }
            Some(target) => match resolve_target::<T>(scene, target, sink) {
                Some(reference) => {
                    self.reference = Some(reference);
                    true
                }
                None => false,
            },
        }
    }
}

// Manual impls keep `T` free of bounds; derives would demand `T: Clone` etc.

impl<T: ?Sized + 'static> Default for Verifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Verifier<T> {
    fn clone(&self) -> Self {
        Self {
            reference: self.reference,
            marker: PhantomData,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Verifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("reference", &self.reference)
            .finish()
    }
}

impl<T: ?Sized> PartialEq for Verifier<T> {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl<T: ?Sized> Eq for Verifier<T> {}

impl<T: ?Sized> Serialize for Verifier<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.reference.serialize(serializer)
    }
}

impl<'de, T: ?Sized> Deserialize<'de> for Verifier<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            reference: Option::<ComponentRef>::deserialize(deserializer)?,
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CaptureSink, Diagnostic};
    use crate::test_support::{Damageable, Decal, Turret};

    #[test]
    fn empty_verifier_is_quietly_invalid() {
        let scene = Scene::new();
        let verifier = Verifier::<dyn Damageable>::new();

        assert_eq!(verifier.reference(), None);
        assert!(!verifier.is_valid(&scene));
        assert!(verifier.resolve(&scene).is_none());
    }

    #[test]
    fn valid_reference_resolves() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(80));

        let verifier = Verifier::<dyn Damageable>::with_reference(turret);
        assert!(verifier.is_valid(&scene));
        assert_eq!(verifier.resolve(&scene).unwrap().hit_points(), 80);

        // Idempotent: repeated queries agree and change nothing
        assert!(verifier.is_valid(&scene));
        assert!(verifier.is_valid(&scene));
    }

    #[test]
    fn incompatible_reference_is_storable_but_invalid() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let decal = scene.attach(entity, Decal);
        // Make the capability known so invalidity is about the type, not
        // registration
        scene.register_component::<Turret>();

        let mut verifier = Verifier::<dyn Damageable>::new();
        verifier.set_reference(Some(decal));

        assert_eq!(verifier.reference(), Some(decal));
        assert!(!verifier.is_valid(&scene));
        assert!(verifier.resolve(&scene).is_none());
    }

    #[test]
    fn despawn_invalidates() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(80));
        let verifier = Verifier::<dyn Damageable>::with_reference(turret);

        assert!(verifier.is_valid(&scene));
        scene.despawn(entity);
        assert!(!verifier.is_valid(&scene));
        assert!(verifier.resolve(&scene).is_none());
    }

    #[test]
    fn detach_invalidates() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(80));
        let verifier = Verifier::<dyn Damageable>::with_reference(turret);

        scene.detach(turret);
        assert!(!verifier.is_valid(&scene));
    }

    #[test]
    fn resolve_mut_reaches_component() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(80));
        let verifier = Verifier::<dyn Damageable>::with_reference(turret);

        verifier.resolve_mut(&mut scene).unwrap().apply_damage(30);
        assert_eq!(verifier.resolve(&scene).unwrap().hit_points(), 50);
    }

    #[test]
    fn clear_assignment_always_applies() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(80));
        let sink = CaptureSink::new();

        let mut verifier = Verifier::<dyn Damageable>::with_reference(turret);
        assert!(verifier.apply_assignment(&scene, None, &sink));
        assert_eq!(verifier.reference(), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn rejected_assignment_keeps_previous_reference() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(80));
        let decal = scene.attach(entity, Decal);
        let sink = CaptureSink::new();

        let mut verifier = Verifier::<dyn Damageable>::with_reference(turret);
        let applied =
            verifier.apply_assignment(&scene, Some(AssignTarget::Component(decal)), &sink);

        assert!(!applied);
        assert_eq!(verifier.reference(), Some(turret));
        assert_eq!(
            sink.take(),
            vec![Diagnostic::ComponentMismatch {
                component: "Decal",
                capability: "Damageable",
            }]
        );
    }

    #[test]
    fn accepted_assignment_replaces_reference() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let old = scene.attach(entity, Turret::new(80));
        let new = scene.attach(entity, Turret::new(10));
        let sink = CaptureSink::new();

        let mut verifier = Verifier::<dyn Damageable>::with_reference(old);
        assert!(verifier.apply_assignment(&scene, Some(AssignTarget::Component(new)), &sink));
        assert_eq!(verifier.reference(), Some(new));
        assert!(sink.is_empty());
    }

    #[test]
    fn clone_and_eq_follow_the_reference() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(80));

        let verifier = Verifier::<dyn Damageable>::with_reference(turret);
        let clone = verifier.clone();
        assert_eq!(verifier, clone);
        assert_ne!(verifier, Verifier::<dyn Damageable>::new());
    }
}
