//! The scene: entities, their attached components, and capability lookup.
//!
//! A [`Scene`] owns an entity allocator and, per entity, an **ordered** list
//! of type-erased components. Attachment order is significant: it is the
//! order the inspector shows components in and the order capability searches
//! scan them in.
//!
//! Every attached component gets a scene-unique [`ComponentId`]; the
//! `(entity, id)` pair forms a [`ComponentRef`], the stable, serializable
//! handle stored by [`Verifier`](crate::Verifier) fields. A `ComponentRef`
//! held across a despawn or detach simply stops resolving.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityCaster, CapabilityRegistry, capability_name};
use crate::component::Component;
use crate::entity::{Entity, EntityAllocator};

/// Scene-unique identifier of an attached component.
///
/// Ids are never reused within a scene, so a detached component's id does not
/// come back on a later attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(u64);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stable handle to one component attached to one entity.
///
/// This is what verifier fields store and what inspector drag payloads carry.
/// The handle does not keep its target alive; resolution against the scene
/// answers whether it still points at something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    pub entity: Entity,
    pub component: ComponentId,
}

impl std::fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.entity, self.component)
    }
}

struct AttachedComponent {
    id: ComponentId,
    component: Box<dyn Component>,
}

/// Entities plus their ordered component lists plus the capability registry.
pub struct Scene {
    entities: EntityAllocator,
    components: HashMap<Entity, Vec<AttachedComponent>>,
    registry: CapabilityRegistry,
    registered_types: HashSet<TypeId>,
    next_component_id: u64,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            components: HashMap::new(),
            registry: CapabilityRegistry::new(),
            registered_types: HashSet::new(),
            next_component_id: 0,
        }
    }

    // ---- Entity management ----

    /// Spawns a new entity and returns its ID.
    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Despawns an entity, dropping all its components.
    ///
    /// Returns `true` if the entity was alive and is now despawned.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        self.components.remove(&entity);
        true
    }

    /// Returns whether the entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> u32 {
        self.entities.count()
    }

    /// Iterates over all currently alive entity IDs.
    pub fn iter_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    // ---- Component management ----

    /// Registers a component type's capabilities without attaching anything.
    ///
    /// Attachment does this automatically; explicit registration is only
    /// needed when a capability must be known to the scene (for validation or
    /// drawers) before any instance of the providing type exists.
    pub fn register_component<C: Component>(&mut self) {
        if self.registered_types.insert(TypeId::of::<C>()) {
            C::register_capabilities(&mut self.registry);
        }
    }

    /// Attaches a component to an entity, appending it to the entity's
    /// component list, and returns the handle to the new attachment.
    ///
    /// The first attachment of each concrete type registers that type's
    /// capabilities.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive.
    pub fn attach<C: Component>(&mut self, entity: Entity, component: C) -> ComponentRef {
        assert!(
            self.entities.is_alive(entity),
            "Cannot attach component on dead entity {entity}"
        );

        self.register_component::<C>();

        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;
        self.components
            .entry(entity)
            .or_default()
            .push(AttachedComponent {
                id,
                component: Box::new(component),
            });
        ComponentRef {
            entity,
            component: id,
        }
    }

    /// Detaches the referenced component.
    ///
    /// Returns `false` if the reference no longer points at anything.
    pub fn detach(&mut self, reference: ComponentRef) -> bool {
        let Some(list) = self.components.get_mut(&reference.entity) else {
            return false;
        };
        let Some(position) = list.iter().position(|a| a.id == reference.component) else {
            return false;
        };
        list.remove(position);
        true
    }

    /// Resolves a reference to the attached component.
    ///
    /// Returns `None` when the entity is dead or the component was detached;
    /// stale handles are safe to hold and query.
    pub fn get(&self, reference: ComponentRef) -> Option<&dyn Component> {
        self.components
            .get(&reference.entity)?
            .iter()
            .find(|a| a.id == reference.component)
            .map(|a| a.component.as_ref())
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, reference: ComponentRef) -> Option<&mut dyn Component> {
        self.components
            .get_mut(&reference.entity)?
            .iter_mut()
            .find(|a| a.id == reference.component)
            .map(|a| a.component.as_mut())
    }

    /// Iterates the entity's components in attachment order.
    pub fn components_of(
        &self,
        entity: Entity,
    ) -> impl Iterator<Item = (ComponentRef, &dyn Component)> + '_ {
        self.components
            .get(&entity)
            .into_iter()
            .flatten()
            .map(move |a| {
                (
                    ComponentRef {
                        entity,
                        component: a.id,
                    },
                    a.component.as_ref(),
                )
            })
    }

    /// Returns the first attached component of concrete type `C`, if any.
    pub fn component_of<C: Component>(&self, entity: Entity) -> Option<(ComponentRef, &C)> {
        self.components_of(entity)
            .find_map(|(reference, component)| {
                component
                    .as_any()
                    .downcast_ref::<C>()
                    .map(|concrete| (reference, concrete))
            })
    }

    // ---- Capability queries ----

    /// Returns whether the referenced component currently satisfies
    /// capability `T`.
    ///
    /// `false` for stale references, for components whose type never
    /// registered a cast to `T`, and for unknown capabilities.
    pub fn satisfies<T: ?Sized + 'static>(&self, reference: ComponentRef) -> bool {
        self.capability::<T>(reference).is_some()
    }

    /// Resolves the referenced component as capability `T`.
    pub fn capability<T: ?Sized + 'static>(&self, reference: ComponentRef) -> Option<&T> {
        let component = self.get(reference)?;
        let caster = self.registry.caster::<T>(component.as_any().type_id())?;
        caster.cast(component)
    }

    /// Mutable variant of [`capability`](Self::capability).
    pub fn capability_mut<T: ?Sized + 'static>(
        &mut self,
        reference: ComponentRef,
    ) -> Option<&mut T> {
        // Look the caster up under a shared borrow, then re-borrow mutably.
        let caster = {
            let component = self.get(reference)?;
            *self.registry.caster::<T>(component.as_any().type_id())?
        };
        let component = self.get_mut(reference)?;
        caster.cast_mut(component)
    }

    /// Finds the first component on `entity` (in attachment order) that
    /// satisfies capability `T`.
    pub fn find_capability<T: ?Sized + 'static>(&self, entity: Entity) -> Option<ComponentRef> {
        self.components_of(entity)
            .find(|(_, component)| {
                self.registry
                    .caster::<T>(component.as_any().type_id())
                    .is_some()
            })
            .map(|(reference, _)| reference)
    }

    /// Returns whether capability `T` was ever registered in this scene.
    pub fn capability_known<T: ?Sized + 'static>(&self) -> bool {
        self.registry.is_known::<T>()
    }

    /// Display name for capability `T`: the registered name, or the short
    /// type name when `T` is unknown to this scene.
    pub fn capability_label<T: ?Sized + 'static>(&self) -> &'static str {
        self.registry
            .name_of::<T>()
            .unwrap_or_else(|| capability_name(std::any::type_name::<T>()))
    }

    /// Copies out the caster for the referenced component, for callers that
    /// cache resolution results.
    pub(crate) fn resolved_caster<T: ?Sized + 'static>(
        &self,
        reference: ComponentRef,
    ) -> Option<CapabilityCaster<T>> {
        let component = self.get(reference)?;
        self.registry
            .caster::<T>(component.as_any().type_id())
            .copied()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Name;
    use crate::test_support::{Barrel, Damageable, Decal, Interactable, Lever, Turret};

    #[test]
    fn attach_and_get() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));

        let component = scene.get(turret).unwrap();
        assert_eq!(component.component_name(), "Turret");
    }

    #[test]
    #[should_panic(expected = "dead entity")]
    fn attach_on_dead_entity_panics() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.despawn(entity);
        scene.attach(entity, Decal);
    }

    #[test]
    fn despawn_drops_components() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));

        assert!(scene.despawn(entity));
        assert!(!scene.is_alive(entity));
        assert!(scene.get(turret).is_none());
        // Second despawn of the same handle is a no-op
        assert!(!scene.despawn(entity));
    }

    #[test]
    fn detach_invalidates_reference() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));

        assert!(scene.detach(turret));
        assert!(scene.get(turret).is_none());
        assert!(!scene.detach(turret));
    }

    #[test]
    fn stale_reference_after_slot_reuse() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));
        scene.despawn(entity);

        // Reuses slot 0 under a new generation
        let replacement = scene.spawn();
        scene.attach(replacement, Turret::new(50));

        assert_eq!(replacement.index(), entity.index());
        assert!(scene.get(turret).is_none());
        assert!(!scene.satisfies::<dyn Damageable>(turret));
    }

    #[test]
    fn components_in_attachment_order() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Decal);
        scene.attach(entity, Turret::new(100));
        scene.attach(entity, Lever::default());

        let names: Vec<_> = scene
            .components_of(entity)
            .map(|(_, c)| c.component_name())
            .collect();
        assert_eq!(names, ["Decal", "Turret", "Lever"]);
    }

    #[test]
    fn component_of_finds_first_concrete() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Decal);
        let named = scene.attach(entity, Name::new("Door"));
        scene.attach(entity, Name::new("Shadow"));

        let (reference, name) = scene.component_of::<Name>(entity).unwrap();
        assert_eq!(reference, named);
        assert_eq!(name.as_str(), "Door");
    }

    #[test]
    fn capability_resolves_for_provider() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));

        assert!(scene.satisfies::<dyn Damageable>(turret));
        let damageable = scene.capability::<dyn Damageable>(turret).unwrap();
        assert_eq!(damageable.hit_points(), 100);
    }

    #[test]
    fn capability_rejects_non_provider() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let decal = scene.attach(entity, Decal);
        let turret = scene.attach(entity, Turret::new(100));

        assert!(!scene.satisfies::<dyn Damageable>(decal));
        assert!(scene.capability::<dyn Damageable>(decal).is_none());
        // A provider of one capability is not a provider of another
        assert!(!scene.satisfies::<dyn Interactable>(turret));
    }

    #[test]
    fn capability_mut_mutates_component() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        let turret = scene.attach(entity, Turret::new(100));

        scene
            .capability_mut::<dyn Damageable>(turret)
            .unwrap()
            .apply_damage(30);
        assert_eq!(
            scene
                .capability::<dyn Damageable>(turret)
                .unwrap()
                .hit_points(),
            70
        );
    }

    #[test]
    fn find_capability_takes_first_in_order() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Decal);
        let barrel = scene.attach(entity, Barrel::new(20));
        scene.attach(entity, Turret::new(100));

        assert_eq!(scene.find_capability::<dyn Damageable>(entity), Some(barrel));
    }

    #[test]
    fn find_capability_none_when_absent() {
        let mut scene = Scene::new();
        let entity = scene.spawn();
        scene.attach(entity, Decal);

        assert_eq!(scene.find_capability::<dyn Damageable>(entity), None);
        // Dead entities never match either
        let dead = scene.spawn();
        scene.despawn(dead);
        assert_eq!(scene.find_capability::<dyn Damageable>(dead), None);
    }

    #[test]
    fn capability_known_after_first_attachment() {
        let mut scene = Scene::new();
        assert!(!scene.capability_known::<dyn Damageable>());

        let entity = scene.spawn();
        scene.attach(entity, Turret::new(1));
        assert!(scene.capability_known::<dyn Damageable>());
        assert_eq!(scene.capability_label::<dyn Damageable>(), "Damageable");
    }

    #[test]
    fn capability_label_falls_back_to_type_name() {
        trait Unregistered {}
        let scene = Scene::new();
        assert_eq!(scene.capability_label::<dyn Unregistered>(), "Unregistered");
    }

    #[test]
    fn register_component_without_attachment() {
        let mut scene = Scene::new();
        scene.register_component::<Turret>();
        assert!(scene.capability_known::<dyn Damageable>());
        assert_eq!(scene.entity_count(), 0);
    }
}
