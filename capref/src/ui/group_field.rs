//! Drop-slot list widget for a [`VerifierGroup`].

use crate::diagnostics::DiagnosticSink;
use crate::group::VerifierGroup;
use crate::resolve::{AssignTarget, resolve_target};
use crate::scene::Scene;
use crate::verifier::Verifier;

use super::verifier_field::{
    error_annotation, mismatch_annotation, show_reference_slot, verifier_field_height,
};
use super::{ERROR_BOX_HEIGHT, FieldEdit, SPACING};

/// One interaction collected while walking the list.
enum GroupEdit {
    Assign(usize, AssignTarget),
    Clear(usize),
    Remove(usize),
    Add,
}

/// Show a collapsible list of drop slots for `group`.
///
/// Each element renders like [`show_verifier_field`](super::show_verifier_field)
/// with its index as the label, plus a remove button. A trailing button
/// appends an unassigned element. All mutations go through the group's own
/// methods, so its cache version advances and the next capability read
/// rebuilds.
///
/// The label doubles as the collapsing-header ID, so it should be unique
/// within the panel.
///
/// Returns `true` if the group changed this frame.
pub fn show_verifier_group_field<T: ?Sized + 'static>(
    ui: &mut egui::Ui,
    scene: &Scene,
    group: &mut VerifierGroup<T>,
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

    // Edits are applied after the walk; with an edit pending, annotations and
    // slot text catch up on the next frame.
    let mut edits: Vec<GroupEdit> = Vec::new();

    egui::CollapsingHeader::new(egui::RichText::new(label).strong())
        .default_open(true)
        .show(ui, |ui| {
            for (index, verifier) in group.verifiers().iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!("{index}"));
                    match show_reference_slot::<T>(ui, scene, verifier.reference()) {
                        Some(FieldEdit::Assign(target)) => {
                            edits.push(GroupEdit::Assign(index, target));
                        }
                        Some(FieldEdit::Clear) => edits.push(GroupEdit::Clear(index)),
                        None => {}
                    }
                    if ui.small_button("-").clicked() {
                        edits.push(GroupEdit::Remove(index));
                    }
                });

                if let Some(message) = mismatch_annotation::<T>(scene, verifier.reference()) {
                    ui.add_space(SPACING);
                    error_annotation(ui, &message);
                }
            }

            ui.horizontal(|ui| {
                if ui.button("+ Add").clicked() {
                    edits.push(GroupEdit::Add);
                }
            });
        });

    let mut changed = false;
    for edit in edits {
        match edit {
            GroupEdit::Assign(index, target) => {
                // A rejected drop reports through the sink and leaves the
                // element (and the cache version) untouched.
                if let Some(reference) = resolve_target::<T>(scene, target, sink) {
                    group.set_reference(index, Some(reference));
                    changed = true;
                }
            }
            GroupEdit::Clear(index) => {
                group.set_reference(index, None);
                changed = true;
            }
            GroupEdit::Remove(index) => {
                group.remove(index);
                changed = true;
            }
            GroupEdit::Add => {
                group.push(Verifier::new());
                changed = true;
            }
        }
    }
    changed
}

/// Height `show_verifier_group_field` will occupy with the header open,
/// given the row height of the surrounding layout. Pure; reports no
/// diagnostics.
pub fn group_field_height<T: ?Sized + 'static>(
    scene: &Scene,
    group: &VerifierGroup<T>,
    row_height: f32,
) -> f32 {
    if !scene.capability_known::<T>() {
        return ERROR_BOX_HEIGHT;
    }
    let mut height = row_height;
    for verifier in group.verifiers() {
        height += SPACING + verifier_field_height(scene, verifier, row_height);
    }
    height + SPACING + row_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Damageable, Decal, Turret};

    const ROW: f32 = 18.0;

    #[test]
    fn empty_group_height_is_header_and_add_row() {
        let mut scene = Scene::new();
        let gun = scene.spawn();
        scene.attach(gun, Turret::new(50));

        let group = VerifierGroup::<dyn Damageable>::new();
        assert_eq!(group_field_height(&scene, &group, ROW), ROW + SPACING + ROW);
    }

    #[test]
    fn mismatched_element_adds_annotation_height() {
        let mut scene = Scene::new();
        let gun = scene.spawn();
        let turret = scene.attach(gun, Turret::new(50));
        let decal = scene.attach(gun, Decal);

        let mut group = VerifierGroup::<dyn Damageable>::with_len(2);
        group.set_reference(0, Some(turret));
        group.set_reference(1, Some(decal));

        let expected = ROW                                       // header
            + SPACING + ROW                                      // valid element
            + SPACING + (ROW + SPACING + ERROR_BOX_HEIGHT)       // mismatched element
            + SPACING + ROW;                                     // add button
        assert_eq!(group_field_height(&scene, &group, ROW), expected);
    }

    #[test]
    fn unknown_capability_collapses_to_annotation() {
        trait Paintable {}

        let scene = Scene::new();
        let group = VerifierGroup::<dyn Paintable>::with_len(3);
        assert_eq!(group_field_height(&scene, &group, ROW), ERROR_BOX_HEIGHT);
    }
}
