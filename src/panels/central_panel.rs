use eframe::egui;

use crate::EscherApp;

/// Drawing canvas: the committed sketch, then the tool preview on top.
pub fn central_panel(app: &mut EscherApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::WHITE))
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;

            app.editor_mut().set_canvas_size(rect.size());
            app.handle_input(ctx, &response);

            painter.rect_filled(rect, 0.0, egui::Color32::WHITE);
            let offset = rect.min.to_vec2();
            app.editor().surface().paint(&painter, offset);
            app.editor().live_surface().paint(&painter, offset);
        });
}
