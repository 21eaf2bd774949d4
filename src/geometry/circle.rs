use super::{GeometryError, Remap};
use nannou::prelude::{Point2, pt2};
use std::f32::consts::TAU;

/// `count` points evenly spaced in angle on a circle, counter-clockwise from +x.
pub fn circle_points(
    radius: f32,
    center: Point2,
    count: usize,
) -> Result<Vec<Point2>, GeometryError> {
    if count == 0 {
        return Err(GeometryError::NoPoints);
    }
    let step = TAU / count as f32;
    Ok((0..count)
        .map(|i| polar(center, radius, i as f32 * step))
        .collect())
}

/// Radial waveform: every `stride`-th magnitude pushes its point outward from
/// `base_radius` by `remap.apply(magnitude)`.
///
/// The angle step is derived from the full array length, so a stride larger
/// than one leaves an angular gap between consecutive points rather than
/// spreading fewer points around the whole circle.
pub fn spectrum_points(
    magnitudes: &[f32],
    stride: usize,
    base_radius: f32,
    center: Point2,
    remap: &Remap,
) -> Result<Vec<Point2>, GeometryError> {
    if magnitudes.is_empty() {
        return Err(GeometryError::EmptyMagnitudes);
    }
    if stride == 0 {
        return Err(GeometryError::ZeroStride);
    }
    if magnitudes.iter().any(|m| !m.is_finite()) {
        return Err(GeometryError::NonFinite);
    }
    let step = TAU / magnitudes.len() as f32;
    Ok(magnitudes
        .iter()
        .enumerate()
        .step_by(stride)
        .map(|(i, &m)| polar(center, base_radius + remap.apply(m), i as f32 * step))
        .collect())
}

fn polar(center: Point2, radius: f32, theta: f32) -> Point2 {
    pt2(center.x + radius * theta.cos(), center.y + radius * theta.sin())
}
