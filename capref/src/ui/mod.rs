//! Inspector UI built on [egui](https://docs.rs/egui).
//!
//! Three building blocks:
//!
//! - **Scene tree** ([`show_scene_tree`]) — all entities with their
//!   components nested. Entities with a [`Name`](crate::Name) component show
//!   their name; others show their entity ID. Click to select; rows are drag
//!   *sources* for reference assignment.
//!
//! - **Verifier field** ([`show_verifier_field`]) — one verified reference as
//!   a labelled drop slot with validity feedback and an error annotation when
//!   the stored reference does not satisfy the capability.
//!
//! - **Group field** ([`show_verifier_group_field`]) — a collapsible list of
//!   verifier fields with add/remove controls, mutating through the group so
//!   its cache version stays honest.
//!
//! # Usage
//!
//! ```ignore
//! use capref::ui::{InspectorState, show_scene_tree, show_verifier_field};
//!
//! // During frame, render into any egui::Ui container:
//! show_scene_tree(ui, &scene, &mut state);
//! show_verifier_field(ui, &scene, &mut door.switch, "switch", &sink);
//! ```
//!
//! Drag payloads are the plain handle types: component rows carry a
//! [`ComponentRef`](crate::ComponentRef), entity rows an
//! [`Entity`](crate::Entity). Drop slots accept either and run them through
//! the resolution rule.

mod group_field;
mod scene_tree;
mod verifier_field;

pub use group_field::{group_field_height, show_verifier_group_field};
pub use scene_tree::show_scene_tree;
pub use verifier_field::{show_verifier_field, verifier_field_height};

use crate::component::Name;
use crate::entity::Entity;
use crate::resolve::AssignTarget;
use crate::scene::Scene;

/// Height of the error annotation box under an invalid reference field.
pub const ERROR_BOX_HEIGHT: f32 = 40.0;

/// Vertical gap between a reference field and its error annotation.
pub const SPACING: f32 = 2.0;

/// An interaction picked up by a reference drop slot, applied by the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldEdit {
    /// Something was dropped; run it through the resolution rule.
    Assign(AssignTarget),
    /// The clear button was pressed.
    Clear,
}

/// Persistent UI state for the inspector panels.
pub struct InspectorState {
    /// Currently selected entity (if any).
    pub selected: Option<Entity>,
    /// Filter text for entity search.
    pub filter: String,
    /// Tracks which tree nodes are expanded (by entity index).
    expanded: std::collections::HashSet<u32>,
}

impl InspectorState {
    pub fn new() -> Self {
        Self {
            selected: None,
            filter: String::new(),
            expanded: std::collections::HashSet::new(),
        }
    }

    pub(crate) fn is_expanded(&self, entity: Entity) -> bool {
        self.expanded.contains(&entity.index())
    }

    pub(crate) fn toggle_expanded(&mut self, entity: Entity) {
        let idx = entity.index();
        if self.expanded.contains(&idx) {
            self.expanded.remove(&idx);
        } else {
            self.expanded.insert(idx);
        }
    }
}

impl Default for InspectorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a display label for an entity.
pub(crate) fn entity_label(scene: &Scene, entity: Entity) -> String {
    if let Some((_, name)) = scene.component_of::<Name>(entity) {
        let s = name.as_str();
        if !s.is_empty() {
            return format!("{} [{}@{}]", s, entity.index(), entity.generation());
        }
    }
    format!("{entity}")
}
