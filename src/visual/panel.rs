use crate::config::{
    POINTS_RANGE, Params, RADIUS_RANGE, REMAP_IN_RANGE, REMAP_OUT_RANGE, STRIDE_RANGE, ZOOM_RANGE,
};
use crate::geometry::FillRule;
use nannou_egui::egui;

/// Binds the parameter set to an egui window. Edits land in `params` directly.
pub fn show(ctx: &egui::Context, params: &mut Params, triangles: usize) {
    egui::Window::new("Parameters")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.add(egui::Slider::new(&mut params.zoom, ZOOM_RANGE).text("zoom"));
            ui.add(egui::Slider::new(&mut params.base_radius, RADIUS_RANGE).text("base radius"));
            ui.add(
                egui::Slider::new(&mut params.spectrum_radius, RADIUS_RANGE).text("spectrum radius"),
            );
            ui.add(egui::Slider::new(&mut params.base_points, POINTS_RANGE).text("base points"));
            ui.add(egui::Slider::new(&mut params.stride, STRIDE_RANGE).text("stride"));

            ui.separator();
            ui.add(egui::Slider::new(&mut params.remap_in_max, REMAP_IN_RANGE).text("input max"));
            ui.add(
                egui::Slider::new(&mut params.remap_out_max, REMAP_OUT_RANGE).text("displacement"),
            );
            ui.checkbox(&mut params.clamp, "clamp displacement");

            ui.separator();
            ui.checkbox(&mut params.wireframe, "wireframe");
            ui.checkbox(&mut params.show_base, "base circle");
            ui.horizontal(|ui| {
                ui.radio_value(&mut params.fill_rule, FillRule::EvenOdd, "even-odd");
                ui.radio_value(&mut params.fill_rule, FillRule::NonZero, "nonzero");
            });
            ui.add(egui::Slider::new(&mut params.hue, 0.0..=1.0).text("hue"));

            ui.separator();
            ui.label(format!("{triangles} triangles"));
            ui.label("space: panel   f: fullscreen   esc: quit");
        });
}
