use eframe::egui;

use crate::EscherApp;
use crate::components::ToolButton;
use crate::config::{DELTA_LINE_WIDTH, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use crate::operation::{LineCap, LineJoin, Style};
use crate::tools::{ToolKind, ToolSession};

pub fn tools_panel(app: &mut EscherApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Tools");
                tool_buttons(app, ui);
                ui.label(format!("State: {}", app.editor().tool().state_name()));

                ui.separator();
                history_section(app, ui);

                ui.separator();
                style_section(app, ui);

                ui.separator();
                file_section(app, ui);
            });
        });
}

fn tool_buttons(app: &mut EscherApp, ui: &mut egui::Ui) {
    let active = app.editor().tool_kind();
    ui.horizontal_wrapped(|ui| {
        for kind in ToolKind::ALL {
            if ToolButton::new(kind, kind == active).show(ui).clicked() && kind != active {
                log::info!("Tool selected from UI: {}", kind.name());
                app.editor_mut().change_tool(kind);
            }
        }
    });
}

fn history_section(app: &mut EscherApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let can_undo = app.editor().can_undo();
        let can_redo = app.editor().can_redo();

        if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
            app.editor_mut().undo();
        }
        if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
            app.editor_mut().redo();
        }
        if ui.button("Reset").clicked() {
            app.editor_mut().reset();
        }
    });

    let history = app.editor().history();
    ui.horizontal(|ui| {
        ui.label(format!("History: {}", history.len()));
        ui.label(format!("Redo: {}", history.redo_len()));
    });

    egui::CollapsingHeader::new("Operations").show(ui, |ui| {
        egui::Grid::new("history_grid")
            .num_columns(2)
            .spacing([40.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                ui.strong("History");
                ui.strong("Redo");
                ui.end_row();

                let entries = history.entries();
                let redo = history.redo_entries();
                for i in 0..entries.len().max(redo.len()) {
                    ui.label(entries.get(i).map_or("", |op| op.tool().label()));
                    ui.label(redo.get(i).map_or("", |op| op.tool().label()));
                    ui.end_row();
                }
            });
    });
}

fn style_section(app: &mut EscherApp, ui: &mut egui::Ui) {
    ui.heading("Style");
    let mut style: Style = *app.editor().style();

    egui::Grid::new("style_grid").num_columns(2).show(ui, |ui| {
        ui.label("Stroke");
        ui.color_edit_button_srgba(&mut style.stroke_color);
        ui.end_row();

        ui.label("Fill");
        ui.color_edit_button_srgba(&mut style.fill_color);
        ui.end_row();

        ui.label("Width");
        ui.add(
            egui::Slider::new(&mut style.line_width, MIN_LINE_WIDTH..=MAX_LINE_WIDTH)
                .step_by(f64::from(DELTA_LINE_WIDTH)),
        );
        ui.end_row();

        ui.label("Cap");
        egui::ComboBox::from_id_salt("line_cap")
            .selected_text(style.line_cap.name())
            .show_ui(ui, |ui| {
                for cap in LineCap::ALL {
                    ui.selectable_value(&mut style.line_cap, cap, cap.name());
                }
            });
        ui.end_row();

        ui.label("Join");
        egui::ComboBox::from_id_salt("line_join")
            .selected_text(style.line_join.name())
            .show_ui(ui, |ui| {
                for join in LineJoin::ALL {
                    ui.selectable_value(&mut style.line_join, join, join.name());
                }
            });
        ui.end_row();

        if style.line_join == LineJoin::Miter {
            ui.label("Miter limit");
            ui.add(egui::DragValue::new(&mut style.miter_limit).range(1.0..=100.0));
            ui.end_row();
        }
    });

    if style != *app.editor().style() {
        app.editor_mut().set_style(style);
    }

    let mut touch_mode = app.touch_mode();
    if ui.checkbox(&mut touch_mode, "Touch mode").changed() {
        app.set_touch_mode(touch_mode);
    }
}

fn file_section(app: &mut EscherApp, ui: &mut egui::Ui) {
    ui.heading("File");
    ui.text_edit_singleline(app.sketch_path_mut());
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            app.save_to_file();
        }
        if ui.button("Load").clicked() {
            app.load_from_file();
        }
    });
    ui.horizontal(|ui| {
        if ui.button("Export SVG").clicked() {
            app.export_svg();
        }
        if ui.button("Export tile").clicked() {
            app.export_tile();
        }
    });
    ui.horizontal(|ui| {
        if ui.button("Export PNG").clicked() {
            app.export_png();
        }
        if ui.button("Export PNG tile").clicked() {
            app.export_png_tile();
        }
    });
    if let Some(status) = app.status() {
        ui.label(status);
    }
}
