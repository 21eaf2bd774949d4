use super::GeometryError;
use nannou::prelude::Point2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadSegment {
    pub from: Point2,
    pub ctrl: Point2,
    pub to: Point2,
}

impl QuadSegment {
    pub fn eval(&self, t: f32) -> Point2 {
        let u = 1.0 - t;
        self.from * (u * u) + self.ctrl * (2.0 * u * t) + self.to * (t * t)
    }
}

/// A closed curve through every input point, one quadratic segment per edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    segments: Vec<QuadSegment>,
}

impl Outline {
    /// Builds the closed outline starting at `points[0]`.
    ///
    /// Each segment's control point is the mean of the two control points a
    /// Catmull-Rom tangent would give at either end, which keeps the curve on
    /// the samples while rounding the corners between them.
    pub fn from_points(points: &[Point2]) -> Result<Self, GeometryError> {
        let n = points.len();
        if n < 2 {
            return Err(GeometryError::TooFewPoints(n));
        }
        let at = |i: isize| points[i.rem_euclid(n as isize) as usize];
        let tangent = |i: isize| (at(i + 1) - at(i - 1)) * 0.5;

        let segments = (0..n as isize)
            .map(|i| {
                let from = at(i);
                let to = at(i + 1);
                let ctrl = ((from + tangent(i) * 0.5) + (to - tangent(i + 1) * 0.5)) * 0.5;
                QuadSegment { from, ctrl, to }
            })
            .collect();
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[QuadSegment] {
        &self.segments
    }

    pub fn start(&self) -> Point2 {
        self.segments[0].from
    }

    pub fn end(&self) -> Point2 {
        self.segments[self.segments.len() - 1].to
    }

    /// Polyline approximation with `steps` samples per segment, closing point included.
    pub fn flatten(&self, steps: usize) -> Vec<Point2> {
        let steps = steps.max(1);
        let mut out = Vec::with_capacity(self.segments.len() * steps + 1);
        for seg in &self.segments {
            for s in 0..steps {
                out.push(seg.eval(s as f32 / steps as f32));
            }
        }
        out.push(self.end());
        out
    }
}
