//! Capability registration and dynamic trait casts.
//!
//! A *capability* is a trait a component can promise to implement. Because
//! components are stored type-erased, going from `&dyn Component` to
//! `&dyn SomeTrait` needs a registered cast per concrete component type.
//! [`CapabilityRegistry`] is that dispatch table: it maps
//! `(component type, capability type)` to a [`CapabilityCaster`] holding the
//! two cast functions.
//!
//! `#[derive(Component)]` with `#[provides(...)]` registers casters
//! automatically; manual [`Component`] impls use
//! [`register_capability!`](crate::register_capability).

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::component::Component;

/// Cast functions from a type-erased component to a capability trait object.
///
/// Both functions return `None` when the component is not the concrete type
/// the caster was registered for.
pub struct CapabilityCaster<T: ?Sized> {
    cast: fn(&dyn Component) -> Option<&T>,
    cast_mut: fn(&mut dyn Component) -> Option<&mut T>,
}

impl<T: ?Sized> CapabilityCaster<T> {
    pub fn new(
        cast: fn(&dyn Component) -> Option<&T>,
        cast_mut: fn(&mut dyn Component) -> Option<&mut T>,
    ) -> Self {
        Self { cast, cast_mut }
    }

    /// Casts a component to the capability trait object.
    pub fn cast<'a>(&self, component: &'a dyn Component) -> Option<&'a T> {
        (self.cast)(component)
    }

    /// Casts a component to the mutable capability trait object.
    pub fn cast_mut<'a>(&self, component: &'a mut dyn Component) -> Option<&'a mut T> {
        (self.cast_mut)(component)
    }
}

// fn pointers are Copy regardless of T, derive would demand T: Copy
impl<T: ?Sized> Clone for CapabilityCaster<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for CapabilityCaster<T> {}

/// Dispatch table for capability casts.
///
/// Keyed by `(concrete component TypeId, capability TypeId)`. Also records
/// the display name of every capability that was ever registered, which backs
/// [`is_known`](Self::is_known) and diagnostic messages.
#[derive(Default)]
pub struct CapabilityRegistry {
    casters: HashMap<(TypeId, TypeId), Box<dyn Any + Send + Sync>>,
    capability_names: HashMap<TypeId, &'static str>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a caster from component type `C` to capability `T`.
    ///
    /// Re-registering the same pair replaces the caster; the capability's
    /// display name keeps its first registration.
    pub fn register<C: Component, T: ?Sized + 'static>(
        &mut self,
        name: &'static str,
        caster: CapabilityCaster<T>,
    ) {
        self.capability_names
            .entry(TypeId::of::<T>())
            .or_insert(name);
        self.casters
            .insert((TypeId::of::<C>(), TypeId::of::<T>()), Box::new(caster));
    }

    /// Looks up the caster from the given concrete component type to `T`.
    pub fn caster<T: ?Sized + 'static>(
        &self,
        component_type: TypeId,
    ) -> Option<&CapabilityCaster<T>> {
        self.casters
            .get(&(component_type, TypeId::of::<T>()))
            .and_then(|entry| entry.downcast_ref::<CapabilityCaster<T>>())
    }

    /// Returns whether capability `T` was ever registered by any component.
    ///
    /// Fields typed over an unknown capability cannot be validated or
    /// assigned; the inspector renders them as an error.
    pub fn is_known<T: ?Sized + 'static>(&self) -> bool {
        self.capability_names.contains_key(&TypeId::of::<T>())
    }

    /// The display name capability `T` was registered under.
    pub fn name_of<T: ?Sized + 'static>(&self) -> Option<&'static str> {
        self.capability_names.get(&TypeId::of::<T>()).copied()
    }

    /// Number of registered `(component, capability)` caster pairs.
    pub fn caster_count(&self) -> usize {
        self.casters.len()
    }
}

/// Strips path segments (and a `dyn` prefix) from a capability type path.
///
/// `"engine::combat::Damageable"` and `"dyn Damageable"` both become
/// `"Damageable"`. Used for registration names and diagnostic labels.
pub fn capability_name(path: &'static str) -> &'static str {
    let name = path.rsplit("::").next().unwrap_or(path).trim();
    name.strip_prefix("dyn ").unwrap_or(name).trim()
}

/// Registers a capability cast for a manually implemented [`Component`].
///
/// Expands to a [`CapabilityRegistry::register`] call wiring up downcast-based
/// cast functions, the same shape `#[derive(Component)]` emits for each
/// `#[provides(...)]` entry:
///
/// ```ignore
/// fn register_capabilities(registry: &mut CapabilityRegistry) {
///     register_capability!(registry, Turret, Damageable);
/// }
/// ```
#[macro_export]
macro_rules! register_capability {
    ($registry:expr, $component:ty, $capability:path) => {
        $registry.register::<$component, dyn $capability>(
            $crate::capability_name(stringify!($capability)),
            $crate::CapabilityCaster::new(
                |component| {
                    component
                        .as_any()
                        .downcast_ref::<$component>()
                        .map(|c| c as &dyn $capability)
                },
                |component| {
                    component
                        .as_any_mut()
                        .downcast_mut::<$component>()
                        .map(|c| c as &mut dyn $capability)
                },
            ),
        )
    };
}
