use super::{GeometryError, Outline};
use nannou::prelude::{Point2, pt2};
use nannou::lyon::math::point;
use nannou::lyon::path::Path;
use nannou::lyon::tessellation::{
    self, BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers,
};

const TOLERANCE: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
}

impl FillRule {
    fn to_lyon(self) -> tessellation::FillRule {
        match self {
            FillRule::EvenOdd => tessellation::FillRule::EvenOdd,
            FillRule::NonZero => tessellation::FillRule::NonZero,
        }
    }
}

/// Triangle list built from one or more closed outlines.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Point2>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn build(outlines: &[&Outline], rule: FillRule) -> Result<Self, GeometryError> {
        if outlines.is_empty() {
            return Err(GeometryError::NoOutlines);
        }
        let finite = outlines.iter().flat_map(|o| o.segments()).all(|s| {
            s.from.is_finite() && s.ctrl.is_finite() && s.to.is_finite()
        });
        if !finite {
            return Err(GeometryError::NonFinite);
        }

        let mut builder = Path::builder();
        for outline in outlines {
            let start = outline.start();
            builder.begin(point(start.x, start.y));
            for seg in outline.segments() {
                builder.quadratic_bezier_to(point(seg.ctrl.x, seg.ctrl.y), point(seg.to.x, seg.to.y));
            }
            builder.end(true);
        }
        let path = builder.build();

        let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
        let options = FillOptions::tolerance(TOLERANCE).with_fill_rule(rule.to_lyon());
        FillTessellator::new()
            .tessellate_path(
                &path,
                &options,
                &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| v.position().to_array()),
            )
            .map_err(|e| GeometryError::Tessellation(format!("{e:?}")))?;

        Ok(Self {
            vertices: buffers.vertices.iter().map(|&[x, y]| pt2(x, y)).collect(),
            indices: buffers.indices,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Point2; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.vertices[t[0] as usize],
                self.vertices[t[1] as usize],
                self.vertices[t[2] as usize],
            ]
        })
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
