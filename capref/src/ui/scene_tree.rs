//! Scene tree view: entities with their components, as drag sources.

use crate::entity::Entity;
use crate::scene::Scene;

use super::{InspectorState, entity_label};

/// Render the scene tree: every live entity with its components nested
/// underneath, expandable via a toggle.
///
/// Entities with a [`Name`](crate::Name) component display their name; others
/// show `Entity(index@generation)`. Clicking a row selects the entity.
///
/// Rows are drag sources for reference slots: an entity row carries the
/// [`Entity`], a component row carries its [`ComponentRef`](crate::ComponentRef).
/// Drop them on a verifier field to assign.
///
/// The caller decides the container (side panel, window, dock tab).
pub fn show_scene_tree(ui: &mut egui::Ui, scene: &Scene, state: &mut InspectorState) {
    ui.horizontal(|ui| {
        ui.label("Filter:");
        ui.text_edit_singleline(&mut state.filter);
    });
    ui.separator();

    ui.label(format!("Entities: {}", scene.entity_count()));
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let mut entities: Vec<Entity> = scene.iter_entities().collect();
            entities.sort_by_key(|e| e.index());

            for entity in entities {
                show_entity_node(ui, scene, entity, state);
            }
        });
}

/// Render a single entity row, with its component rows when expanded.
fn show_entity_node(ui: &mut egui::Ui, scene: &Scene, entity: Entity, state: &mut InspectorState) {
    let label = entity_label(scene, entity);

    if !state.filter.is_empty() && !label.to_lowercase().contains(&state.filter.to_lowercase()) {
        return;
    }

    let has_components = scene.components_of(entity).next().is_some();
    let is_selected = state.selected == Some(entity);

    // Button::selectable looks like selectable_label but supports
    // click_and_drag sense so both selection and drag-and-drop work.
    let entity_button =
        egui::Button::selectable(is_selected, &label).sense(egui::Sense::click_and_drag());

    if has_components {
        ui.horizontal(|ui| {
            let toggle_text = if state.is_expanded(entity) { "v" } else { ">" };
            if ui.small_button(toggle_text).clicked() {
                state.toggle_expanded(entity);
            }
            let resp = ui.add(entity_button);
            if resp.clicked() {
                state.selected = Some(entity);
            }
            resp.dnd_set_drag_payload(entity);
        });

        if state.is_expanded(entity) {
            ui.indent(egui::Id::new(("scene_tree", entity.index())), |ui| {
                for (reference, component) in scene.components_of(entity) {
                    let resp = ui.add(
                        egui::Button::selectable(false, component.component_name())
                            .sense(egui::Sense::click_and_drag()),
                    );
                    if resp.clicked() {
                        state.selected = Some(entity);
                    }
                    resp.dnd_set_drag_payload(reference);
                }
            });
        }
    } else {
        ui.horizontal(|ui| {
            ui.add_space(20.0); // indent to match toggle button width
            let resp = ui.add(entity_button);
            if resp.clicked() {
                state.selected = Some(entity);
            }
            resp.dnd_set_drag_payload(entity);
        });
    }
}
