//! The resolution rule applied when something is dropped on a verified
//! reference field.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::entity::Entity;
use crate::scene::{ComponentRef, Scene};

/// What was dropped onto a verified reference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTarget {
    /// A single component.
    Component(ComponentRef),
    /// A whole entity; resolution scans its attached components.
    Composite(Entity),
}

/// Resolves a dropped target to a reference satisfying capability `T`.
///
/// - A component target is accepted iff it currently satisfies `T`;
///   otherwise a [`Diagnostic::ComponentMismatch`] is reported. Stale
///   references reject the same way.
/// - A composite target is scanned in attachment order and the **first**
///   satisfying component wins; when none does, a
///   [`Diagnostic::NoSatisfyingComponent`] is reported. Multiple satisfying
///   siblings are not disambiguated.
///
/// Returns `None` on rejection. Rejection is non-fatal; callers keep
/// whatever reference they had.
pub fn resolve_target<T: ?Sized + 'static>(
    scene: &Scene,
    target: AssignTarget,
    sink: &dyn DiagnosticSink,
) -> Option<ComponentRef> {
    match target {
        AssignTarget::Component(reference) => {
            if scene.satisfies::<T>(reference) {
                Some(reference)
            } else {
                let component = scene
                    .get(reference)
                    .map(|c| c.component_name())
                    .unwrap_or("<missing>");
                sink.report(Diagnostic::ComponentMismatch {
                    component,
                    capability: scene.capability_label::<T>(),
                });
                None
            }
        }
        AssignTarget::Composite(entity) => match scene.find_capability::<T>(entity) {
            Some(reference) => Some(reference),
            None => {
                sink.report(Diagnostic::NoSatisfyingComponent {
                    entity,
                    capability: scene.capability_label::<T>(),
                });
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CaptureSink;
    use crate::test_support::{Barrel, Damageable, Decal, Interactable, Lever, Turret};

    #[test]
    fn component_target_accepted_when_satisfying() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));
        let sink = CaptureSink::new();

        let resolved =
            resolve_target::<dyn Damageable>(&scene, AssignTarget::Component(turret), &sink);
        assert_eq!(resolved, Some(turret));
        assert!(sink.is_empty());
    }

    #[test]
    fn component_target_rejected_with_mismatch() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let decal = scene.attach(entity, Decal);
        scene.register_component::<Turret>();
        let sink = CaptureSink::new();

        let resolved =
            resolve_target::<dyn Damageable>(&scene, AssignTarget::Component(decal), &sink);
        assert_eq!(resolved, None);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::ComponentMismatch {
                component: "Decal",
                capability: "Damageable",
            }]
        );
    }

    #[test]
    fn stale_component_target_rejected() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));
        scene.despawn(entity);
        let sink = CaptureSink::new();

        let resolved =
            resolve_target::<dyn Damageable>(&scene, AssignTarget::Component(turret), &sink);
        assert_eq!(resolved, None);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::ComponentMismatch {
                component: "<missing>",
                capability: "Damageable",
            }]
        );
    }

    #[test]
    fn composite_takes_first_satisfying_component() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Decal);
        let first = scene.attach(entity, Turret::new(100));
        scene.attach(entity, Barrel::new(20));
        let sink = CaptureSink::new();

        let resolved =
            resolve_target::<dyn Damageable>(&scene, AssignTarget::Composite(entity), &sink);
        assert_eq!(resolved, Some(first));
        assert!(sink.is_empty());
    }

    #[test]
    fn composite_rejected_when_nothing_satisfies() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Decal);
        scene.attach(entity, Lever);
        scene.register_component::<Turret>();
        let sink = CaptureSink::new();

        let resolved =
            resolve_target::<dyn Damageable>(&scene, AssignTarget::Composite(entity), &sink);
        assert_eq!(resolved, None);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::NoSatisfyingComponent {
                entity,
                capability: "Damageable",
            }]
        );
    }

    #[test]
    fn composite_resolution_is_per_capability() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Turret::new(100));
        let lever = scene.attach(entity, Lever);
        let sink = CaptureSink::new();

        let resolved =
            resolve_target::<dyn Interactable>(&scene, AssignTarget::Composite(entity), &sink);
        assert_eq!(resolved, Some(lever));
        assert_eq!(
            scene
                .capability::<dyn Interactable>(resolved.unwrap())
                .unwrap()
                .prompt(),
            "Pull"
        );
    }

    #[test]
    fn dead_composite_rejected() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Turret::new(100));
        scene.despawn(entity);
        let sink = CaptureSink::new();

        let resolved =
            resolve_target::<dyn Damageable>(&scene, AssignTarget::Composite(entity), &sink);
        assert_eq!(resolved, None);
        assert_eq!(sink.len(), 1);
    }
}
