//! Drop-slot widget for a single [`Verifier`] field.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::entity::Entity;
use crate::resolve::AssignTarget;
use crate::scene::{ComponentRef, Scene};
use crate::verifier::Verifier;

use super::{ERROR_BOX_HEIGHT, FieldEdit, SPACING, entity_label};

/// Show a labelled drop slot for `verifier`.
///
/// The slot accepts drags of a [`ComponentRef`] (a component row from the
/// scene tree) or an [`Entity`] (an entity row); either is run through the
/// resolution rule on release. While a payload hovers the slot, the outline
/// turns blue if the drop would resolve and red if it would be rejected.
/// A rejected drop keeps the previous reference and reports through `sink`.
///
/// If the stored reference points at a live component that does not satisfy
/// the capability, an error annotation is drawn under the slot. A reference
/// to a despawned or detached component reads as unassigned and draws no
/// annotation.
///
/// Returns `true` if the verifier changed this frame.
pub fn show_verifier_field<T: ?Sized + 'static>(
    ui: &mut egui::Ui,
    scene: &Scene,
    verifier: &mut Verifier<T>,
    label: &str,
    sink: &dyn DiagnosticSink,
) -> bool {
    if !scene.capability_known::<T>() {
        error_annotation(
            ui,
            &format!(
                "Capability '{}' is not registered in this scene",
                scene.capability_label::<T>()
            ),
        );
        return false;
    }

    let edit = ui
        .horizontal(|ui| {
            ui.label(label);
            show_reference_slot::<T>(ui, scene, verifier.reference())
        })
        .inner;

    let changed = match edit {
        Some(FieldEdit::Assign(target)) => verifier.apply_assignment(scene, Some(target), sink),
        Some(FieldEdit::Clear) => verifier.apply_assignment(scene, None, sink),
        None => false,
    };

    // Annotation reflects the post-edit reference, so a successful drop
    // replaces or clears it on the same frame.
    if let Some(message) = mismatch_annotation::<T>(scene, verifier.reference()) {
        ui.add_space(SPACING);
        error_annotation(ui, &message);
    }

    changed
}

/// Height `show_verifier_field` will occupy, given the row height of the
/// surrounding layout. Pure; reports no diagnostics.
pub fn verifier_field_height<T: ?Sized + 'static>(
    scene: &Scene,
    verifier: &Verifier<T>,
    row_height: f32,
) -> f32 {
    if !scene.capability_known::<T>() {
        return ERROR_BOX_HEIGHT;
    }
    if mismatch_annotation::<T>(scene, verifier.reference()).is_some() {
        row_height + SPACING + ERROR_BOX_HEIGHT
    } else {
        row_height
    }
}

/// Render the slot button with drag-and-drop handling and the clear button,
/// inside the caller's row layout. Collects the interaction without applying
/// it.
///
/// Shared with the group drawer, which applies edits through the group so
/// the cache version stays in step.
pub(crate) fn show_reference_slot<T: ?Sized + 'static>(
    ui: &mut egui::Ui,
    scene: &Scene,
    reference: Option<ComponentRef>,
) -> Option<FieldEdit> {
    let mut edit = None;

    let response = ui.add(egui::Button::new(slot_text(scene, reference)));

    if let Some(payload) = response.dnd_hover_payload::<ComponentRef>() {
        drop_feedback(ui, response.rect, scene.satisfies::<T>(*payload));
    } else if let Some(payload) = response.dnd_hover_payload::<Entity>() {
        drop_feedback(ui, response.rect, scene.find_capability::<T>(*payload).is_some());
    }

    if let Some(payload) = response.dnd_release_payload::<ComponentRef>() {
        edit = Some(FieldEdit::Assign(AssignTarget::Component(*payload)));
    } else if let Some(payload) = response.dnd_release_payload::<Entity>() {
        edit = Some(FieldEdit::Assign(AssignTarget::Composite(*payload)));
    }

    if reference.is_some() && ui.small_button("x").clicked() {
        edit = Some(FieldEdit::Clear);
    }

    edit
}

/// Text shown inside the slot button.
fn slot_text(scene: &Scene, reference: Option<ComponentRef>) -> String {
    match reference {
        None => "(none)".to_owned(),
        Some(reference) => match scene.get(reference) {
            Some(component) => format!(
                "{} ({})",
                entity_label(scene, reference.entity),
                component.component_name()
            ),
            None => "(missing)".to_owned(),
        },
    }
}

/// Message for the error annotation, or `None` when no annotation is due.
///
/// Only a live component that fails the capability check produces one.
pub(crate) fn mismatch_annotation<T: ?Sized + 'static>(
    scene: &Scene,
    reference: Option<ComponentRef>,
) -> Option<String> {
    let reference = reference?;
    let component = scene.get(reference)?;
    if scene.satisfies::<T>(reference) {
        return None;
    }
    Some(
        Diagnostic::ComponentMismatch {
            component: component.component_name(),
            capability: scene.capability_label::<T>(),
        }
        .to_string(),
    )
}

/// Outline the slot while a payload hovers it. Blue means the drop would
/// resolve, red means it would be rejected.
fn drop_feedback(ui: &egui::Ui, rect: egui::Rect, accepts: bool) {
    let color = if accepts {
        egui::Color32::from_rgb(100, 160, 255)
    } else {
        egui::Color32::from_rgb(255, 80, 80)
    };
    ui.painter().rect_stroke(
        rect,
        egui::CornerRadius::same(2),
        egui::Stroke::new(2.0, color),
        egui::StrokeKind::Outside,
    );
}

/// Fixed-height error box, outlined in the error color.
pub(crate) fn error_annotation(ui: &mut egui::Ui, message: &str) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), ERROR_BOX_HEIGHT),
        egui::Sense::hover(),
    );
    let color = ui.visuals().error_fg_color;
    ui.painter().rect_stroke(
        rect,
        egui::CornerRadius::same(2),
        egui::Stroke::new(1.0, color),
        egui::StrokeKind::Inside,
    );
    ui.put(
        rect.shrink(4.0),
        egui::Label::new(egui::RichText::new(message).color(color)).wrap(),
    );
}
