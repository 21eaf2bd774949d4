use crate::audio::SpectrumSource;
use crate::config::Params;
use crate::geometry::{FillRule, GeometryError, Mesh, Outline, circle_points, spectrum_points};
use anyhow::Context;
use nannou::prelude::Point2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
    Shutdown,
}

/// Per-frame state of the visualizer: parameters, outlines and the current mesh.
pub struct Scene {
    pub params: Params,
    phase: Phase,
    center: Point2,
    base: Option<Outline>,
    base_key: (u32, usize),
    fill_key: (FillRule, bool),
    dynamic: Option<Outline>,
    mesh: Mesh,
}

impl Scene {
    pub fn new(params: Params) -> Self {
        let params = params.sanitized();
        Self {
            base_key: params.base_key(),
            fill_key: params.fill_key(),
            params,
            phase: Phase::Uninitialized,
            center: Point2::ZERO,
            base: None,
            dynamic: None,
            mesh: Mesh::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Outlines currently feeding the mesh.
    pub fn outlines(&self) -> impl Iterator<Item = &Outline> {
        self.base
            .iter()
            .filter(|_| self.params.show_base)
            .chain(self.dynamic.iter())
    }

    /// Starts the source and builds the initial geometry from static radii.
    pub fn setup<S: SpectrumSource + ?Sized>(
        &mut self,
        source: &mut S,
        center: Point2,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.phase == Phase::Uninitialized,
            "scene already set up ({:?})",
            self.phase
        );
        source.setup().context("Failed to start audio source")?;
        let base = self.base_outline(center)?;
        let dynamic = Outline::from_points(&circle_points(
            self.params.spectrum_radius,
            center,
            self.params.base_points,
        )?)?;
        self.center = center;
        self.commit(Some(base), Some(dynamic))?;
        self.phase = Phase::Ready;
        log::info!("scene ready, {} triangles", self.mesh.triangle_count());
        Ok(())
    }

    /// Polls the source and replaces the mesh when a new frame arrived.
    /// Returns whether the mesh was rebuilt. On error the previous outlines
    /// and mesh are left in place.
    pub fn update<S: SpectrumSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<bool, GeometryError> {
        if self.phase != Phase::Ready {
            return Ok(false);
        }
        self.params = self.params.clone().sanitized();

        let base = if self.params.base_key() != self.base_key {
            Some(self.base_outline(self.center)?)
        } else {
            None
        };
        let mut dirty = base.is_some() || self.params.fill_key() != self.fill_key;

        source.update();
        let mut dynamic = None;
        if source.has_data() {
            let data = source.data();
            if data.is_empty() {
                log::warn!("audio source reported an empty frame, skipping");
            } else {
                let points = spectrum_points(
                    data,
                    self.params.stride,
                    self.params.spectrum_radius,
                    self.center,
                    &self.params.remap(),
                )?;
                // a stride past the frame length leaves a single point
                if points.len() >= 2 {
                    dynamic = Some(Outline::from_points(&points)?);
                    dirty = true;
                }
            }
        }

        if dirty {
            self.commit(base, dynamic)?;
            log::trace!("mesh rebuilt, {} triangles", self.mesh.triangle_count());
        }
        Ok(dirty)
    }

    /// Moves the geometry onto a new anchor point.
    ///
    /// nannou window coordinates are centred on the origin, so the driver
    /// passes the same center on every resize and this returns early there.
    pub fn resize(&mut self, center: Point2) -> Result<(), GeometryError> {
        if self.center == center || self.phase != Phase::Ready {
            self.center = center;
            return Ok(());
        }
        let offset = center - self.center;
        let dynamic = match &self.dynamic {
            Some(outline) => {
                let moved: Vec<Point2> =
                    outline.segments().iter().map(|s| s.from + offset).collect();
                Some(Outline::from_points(&moved)?)
            }
            None => None,
        };
        let base = self.base_outline(center)?;
        let previous = std::mem::replace(&mut self.center, center);
        if let Err(e) = self.commit(Some(base), dynamic) {
            self.center = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn shutdown<S: SpectrumSource + ?Sized>(&mut self, source: &mut S) {
        if self.phase != Phase::Shutdown {
            source.shutdown();
            self.phase = Phase::Shutdown;
            log::info!("scene shut down");
        }
    }

    fn base_outline(&self, center: Point2) -> Result<Outline, GeometryError> {
        let points = circle_points(self.params.base_radius, center, self.params.base_points)?;
        Outline::from_points(&points)
    }

    /// Tessellates the candidate outlines (falling back to the current ones)
    /// and only stores them once the mesh is built.
    fn commit(
        &mut self,
        base: Option<Outline>,
        dynamic: Option<Outline>,
    ) -> Result<(), GeometryError> {
        let base_ref = base.as_ref().or(self.base.as_ref());
        let dynamic_ref = dynamic.as_ref().or(self.dynamic.as_ref());
        let outlines: Vec<&Outline> = base_ref
            .filter(|_| self.params.show_base)
            .into_iter()
            .chain(dynamic_ref)
            .collect();
        let mesh = Mesh::build(&outlines, self.params.fill_rule)?;

        self.mesh = mesh;
        if let Some(base) = base {
            self.base = Some(base);
            self.base_key = self.params.base_key();
        }
        if let Some(dynamic) = dynamic {
            self.dynamic = Some(dynamic);
        }
        self.fill_key = self.params.fill_key();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::pt2;

    #[derive(Default)]
    struct FakeSource {
        frames: Vec<Vec<f32>>,
        current: Vec<f32>,
        ready: bool,
        started: bool,
        stopped: bool,
        fail_setup: bool,
        updates: usize,
    }

    impl SpectrumSource for FakeSource {
        fn setup(&mut self) -> anyhow::Result<()> {
            anyhow::ensure!(!self.fail_setup, "no output device");
            self.started = true;
            Ok(())
        }

        fn update(&mut self) {
            self.updates += 1;
            if !self.frames.is_empty() {
                self.current = self.frames.remove(0);
                self.ready = true;
            }
        }

        fn has_data(&self) -> bool {
            self.ready
        }

        fn data(&self) -> &[f32] {
            &self.current
        }

        fn shutdown(&mut self) {
            self.stopped = true;
        }
    }

    fn ready_scene(source: &mut FakeSource) -> Scene {
        let mut scene = Scene::new(Params::default());
        scene.setup(source, pt2(0.0, 0.0)).unwrap();
        scene
    }

    #[test]
    fn setup_builds_initial_mesh() {
        let mut source = FakeSource::default();
        let scene = ready_scene(&mut source);
        assert!(source.started);
        assert_eq!(scene.phase(), Phase::Ready);
        assert!(!scene.mesh().is_empty());
    }

    #[test]
    fn setup_failure_is_reported() {
        let mut source = FakeSource {
            fail_setup: true,
            ..Default::default()
        };
        let mut scene = Scene::new(Params::default());
        let err = scene.setup(&mut source, pt2(0.0, 0.0)).unwrap_err();
        assert!(format!("{err:#}").contains("no output device"));
        assert_eq!(scene.phase(), Phase::Uninitialized);
    }

    #[test]
    fn update_without_data_keeps_mesh() {
        let mut source = FakeSource::default();
        let mut scene = ready_scene(&mut source);
        let before = scene.mesh().indices.clone();
        assert!(!scene.update(&mut source).unwrap());
        assert_eq!(source.updates, 1);
        assert_eq!(scene.mesh().indices, before);
    }

    #[test]
    fn new_frame_replaces_mesh() {
        let mut source = FakeSource {
            frames: vec![vec![0.4; 64]],
            ..Default::default()
        };
        let mut scene = ready_scene(&mut source);
        let before = scene.mesh().vertices.clone();
        assert!(scene.update(&mut source).unwrap());
        assert_ne!(scene.mesh().vertices, before);
        // spectrum circle now sits at 200 + 250
        let far = scene
            .mesh()
            .vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0f32, f32::max);
        assert!((far - 450.0).abs() < 5.0, "{far}");
    }

    #[test]
    fn empty_frame_is_a_no_op() {
        let mut source = FakeSource {
            frames: vec![Vec::new()],
            ..Default::default()
        };
        let mut scene = ready_scene(&mut source);
        assert!(!scene.update(&mut source).unwrap());
        assert!(!scene.mesh().is_empty());
    }

    #[test]
    fn param_change_rebuilds_base() {
        let mut source = FakeSource::default();
        let mut scene = ready_scene(&mut source);
        scene.params.base_radius = 90.0;
        scene.params.fill_rule = FillRule::NonZero;
        assert!(scene.update(&mut source).unwrap());
        assert!(!scene.update(&mut source).unwrap());

        scene.params.show_base = false;
        assert!(scene.update(&mut source).unwrap());
    }

    #[test]
    fn update_before_setup_and_after_shutdown_is_ignored() {
        let mut source = FakeSource {
            frames: vec![vec![0.1; 8]],
            ..Default::default()
        };
        let mut scene = Scene::new(Params::default());
        assert!(!scene.update(&mut source).unwrap());
        assert_eq!(source.updates, 0);

        scene.setup(&mut source, pt2(0.0, 0.0)).unwrap();
        scene.shutdown(&mut source);
        assert!(source.stopped);
        assert_eq!(scene.phase(), Phase::Shutdown);
        assert!(!scene.update(&mut source).unwrap());
        assert_eq!(source.updates, 0);
    }

    #[test]
    fn resize_moves_geometry_to_new_center() {
        let mut source = FakeSource::default();
        let mut scene = ready_scene(&mut source);
        scene.resize(pt2(100.0, 50.0)).unwrap();
        assert_eq!(scene.center(), pt2(100.0, 50.0));
        let (min_x, max_x) = scene
            .mesh()
            .vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v.x), hi.max(v.x)));
        assert!(((min_x + max_x) * 0.5 - 100.0).abs() < 2.0);
    }

    #[test]
    fn non_finite_frame_is_an_error() {
        let mut source = FakeSource {
            frames: vec![vec![f32::NAN; 16]],
            ..Default::default()
        };
        let mut scene = ready_scene(&mut source);
        let before = scene.mesh().vertices.clone();
        assert_eq!(scene.update(&mut source), Err(GeometryError::NonFinite));
        assert_eq!(scene.mesh().vertices, before);
    }

    #[test]
    fn stride_past_frame_keeps_previous_outline() {
        let mut source = FakeSource {
            frames: vec![vec![0.4; 8]],
            ..Default::default()
        };
        let mut scene = ready_scene(&mut source);
        scene.params.stride = 64;
        let before = scene.mesh().vertices.clone();
        assert!(!scene.update(&mut source).unwrap());
        assert_eq!(scene.mesh().vertices, before);
    }

    #[test]
    fn clamp_caps_spectrum_radius() {
        let mut source = FakeSource {
            frames: vec![vec![2.0; 64]],
            ..Default::default()
        };
        let mut scene = ready_scene(&mut source);
        scene.params.clamp = true;
        assert!(scene.update(&mut source).unwrap());
        let want = scene.params.spectrum_radius + scene.params.remap_out_max;
        let far = scene
            .mesh()
            .vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0f32, f32::max);
        // unclamped this would be 200 + 1250
        assert!((far - want).abs() < 5.0, "{far} != {want}");
    }

    #[test]
    fn failed_rebuild_leaves_outlines_and_mesh_untouched() {
        let mut source = FakeSource {
            frames: vec![vec![0.4; 64], vec![0.4; 64]],
            ..Default::default()
        };
        let mut scene = ready_scene(&mut source);
        scene.params.base_radius = 90.0;
        // sanitized() leaves NaN as is, so the new spectrum outline fails to tessellate
        scene.params.spectrum_radius = f32::NAN;
        let mesh_before = scene.mesh().vertices.clone();
        let outlines_before: Vec<Outline> = scene.outlines().cloned().collect();

        assert_eq!(scene.update(&mut source), Err(GeometryError::NonFinite));
        assert_eq!(scene.mesh().vertices, mesh_before);
        let outlines_after: Vec<Outline> = scene.outlines().cloned().collect();
        assert_eq!(outlines_after, outlines_before);

        // the base change is retried on the next frame
        scene.params.spectrum_radius = 200.0;
        assert!(scene.update(&mut source).unwrap());
        let near = scene
            .mesh()
            .vertices
            .iter()
            .map(|v| v.length())
            .fold(f32::MAX, f32::min);
        assert!((near - 90.0).abs() < 2.0, "{near}");
    }

    #[test]
    fn resize_to_same_center_keeps_mesh() {
        let mut source = FakeSource::default();
        let mut scene = ready_scene(&mut source);
        let before = scene.mesh().vertices.clone();
        scene.resize(pt2(0.0, 0.0)).unwrap();
        assert_eq!(scene.mesh().vertices, before);
    }

    #[test]
    fn setup_twice_is_an_error() {
        let mut source = FakeSource::default();
        let mut scene = ready_scene(&mut source);
        assert!(scene.setup(&mut source, pt2(0.0, 0.0)).is_err());
    }
}
