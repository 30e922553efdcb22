//! Shared fixtures for unit tests: a couple of capability traits and
//! manually implemented components providing them.

use std::any::Any;

use crate::capability::CapabilityRegistry;
use crate::component::Component;
use crate::register_capability;

pub(crate) trait Damageable {
    fn hit_points(&self) -> i32;
    fn apply_damage(&mut self, amount: i32);
}

pub(crate) trait Interactable {
    fn prompt(&self) -> &str;
}

pub(crate) struct Turret {
    pub hp: i32,
}

impl Turret {
    pub fn new(hp: i32) -> Self {
        Self { hp }
    }
}

impl Component for Turret {
    fn component_name(&self) -> &'static str {
        "Turret"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn register_capabilities(registry: &mut CapabilityRegistry) {
        register_capability!(registry, Turret, Damageable);
    }
}

impl Damageable for Turret {
    fn hit_points(&self) -> i32 {
        self.hp
    }

    fn apply_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }
}

pub(crate) struct Barrel {
    pub hp: i32,
}

impl Barrel {
    pub fn new(hp: i32) -> Self {
        Self { hp }
    }
}

impl Component for Barrel {
    fn component_name(&self) -> &'static str {
        "Barrel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn register_capabilities(registry: &mut CapabilityRegistry) {
        register_capability!(registry, Barrel, Damageable);
    }
}

impl Damageable for Barrel {
    fn hit_points(&self) -> i32 {
        self.hp
    }

    fn apply_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }
}

#[derive(Default)]
pub(crate) struct Lever;

impl Component for Lever {
    fn component_name(&self) -> &'static str {
        "Lever"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn register_capabilities(registry: &mut CapabilityRegistry) {
        register_capability!(registry, Lever, Interactable);
    }
}

impl Interactable for Lever {
    fn prompt(&self) -> &str {
        "Pull"
    }
}

/// Provides no capabilities at all.
pub(crate) struct Decal;

impl Component for Decal {
    fn component_name(&self) -> &'static str {
        "Decal"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
