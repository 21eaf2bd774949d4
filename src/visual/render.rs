use crate::scene::Scene;
use nannou::prelude::*;

/// Draws the scene mesh filled or as a wireframe, scaled by the zoom parameter.
pub struct MeshRenderer {
    pub line_weight: f32,
    pub fill_alpha: f32,
    pub curve_steps: usize,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self {
            line_weight: 1.0,
            fill_alpha: 0.9,
            curve_steps: 4,
        }
    }
}

impl MeshRenderer {
    pub fn draw(&self, draw: &Draw, scene: &Scene) {
        draw.background().color(BLACK);
        let mesh = scene.mesh();
        let params = &scene.params;
        if mesh.is_empty() {
            return;
        }

        // zoom about the window center
        let center = scene.center().extend(0.0);
        let draw = draw.translate(center).scale(params.zoom).translate(-center);
        let weight = self.line_weight / params.zoom;

        if params.wireframe {
            let edges = hsva(params.hue, 0.6, 1.0, 0.5);
            for [a, b, c] in mesh.triangles() {
                draw.polyline().weight(weight).points([a, b, c, a]).color(edges);
            }
            let curve = hsva(params.hue, 0.2, 1.0, 1.0);
            for outline in scene.outlines() {
                draw.polyline()
                    .weight(weight * 2.0)
                    .points(outline.flatten(self.curve_steps))
                    .color(curve);
            }
        } else {
            draw.mesh()
                .indexed(
                    mesh.vertices.iter().map(|v| pt3(v.x, v.y, 0.0)),
                    mesh.indices.iter().map(|&i| i as usize),
                )
                .color(hsva(params.hue, 0.8, 1.0, self.fill_alpha));
        }
    }
}
