use eframe::egui;

use crate::EscherApp;
use crate::config::{MAX_GRID, MIN_SPACING, Symmetry, SymmetryState};
use crate::symmetry::WallpaperGroup;

/// Symmetry family and placement controls. Any edit replays the sketch.
pub fn symmetry_panel(app: &mut EscherApp, ctx: &egui::Context) {
    egui::SidePanel::right("symmetry_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Symmetry");
            let mut state = *app.editor().symmetry();

            group_picker(ui, &mut state);
            ui.separator();

            egui::Grid::new("symmetry_grid").num_columns(2).show(ui, |ui| {
                ui.label("Center x");
                ui.add(egui::DragValue::new(&mut state.x));
                ui.end_row();
                ui.label("Center y");
                ui.add(egui::DragValue::new(&mut state.y));
                ui.end_row();

                match state.sym {
                    Symmetry::None => {}
                    Symmetry::Wallpaper(_) => lattice_controls(ui, &mut state),
                    Symmetry::Rosette => rosette_controls(ui, &mut state),
                }
            });

            if ui.button("Center on canvas").clicked() {
                let canvas = app.editor().canvas_size();
                state.x = (canvas.x / 2.0).round();
                state.y = (canvas.y / 2.0).round();
            }

            if state != *app.editor().symmetry() {
                log::debug!("symmetry changed to {}", state.sym.label());
                app.editor_mut().set_symmetry(state);
            }

            ui.separator();
            ui.label(format!("{} transforms", app.editor().transforms().len()));
        });
}

fn group_picker(ui: &mut egui::Ui, state: &mut SymmetryState) {
    egui::ComboBox::from_id_salt("symmetry_group")
        .selected_text(state.sym.label())
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut state.sym, Symmetry::None, "none");
            for group in WallpaperGroup::ALL {
                ui.selectable_value(&mut state.sym, Symmetry::Wallpaper(group), group.name());
            }
            ui.selectable_value(&mut state.sym, Symmetry::Rosette, "rosette");
        });
}

fn lattice_controls(ui: &mut egui::Ui, state: &mut SymmetryState) {
    ui.label("Spacing");
    ui.add(egui::DragValue::new(&mut state.d).range(MIN_SPACING..=1000.0));
    ui.end_row();

    ui.label("Tilt");
    ui.drag_angle(&mut state.t);
    ui.end_row();

    ui.label("Dynamic grid");
    ui.checkbox(&mut state.dynamic_grid_size, "");
    ui.end_row();

    ui.label("Nx");
    ui.add_enabled(
        !state.dynamic_grid_size,
        egui::DragValue::new(&mut state.nx).range(1..=MAX_GRID),
    );
    ui.end_row();

    ui.label("Ny");
    ui.add_enabled(
        !state.dynamic_grid_size,
        egui::DragValue::new(&mut state.ny).range(1..=MAX_GRID),
    );
    ui.end_row();
}

fn rosette_controls(ui: &mut egui::Ui, state: &mut SymmetryState) {
    ui.label("Rotations");
    ui.add(egui::DragValue::new(&mut state.nrot).range(0..=60));
    ui.end_row();

    let mut mirrored = state.nref > 0;
    ui.label("Mirror");
    if ui.checkbox(&mut mirrored, "").changed() {
        state.nref = i32::from(mirrored);
    }
    ui.end_row();

    ui.label("Rotation");
    ui.add(
        egui::DragValue::new(&mut state.rot)
            .range(-360.0..=360.0)
            .suffix("°"),
    );
    ui.end_row();
}
