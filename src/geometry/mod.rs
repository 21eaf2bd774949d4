pub mod circle;
pub mod mesh;
pub mod outline;
pub mod remap;

pub use circle::{circle_points, spectrum_points};
pub use mesh::{FillRule, Mesh};
pub use outline::Outline;
pub use remap::Remap;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    #[error("circle needs at least one point")]
    NoPoints,
    #[error("outline needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("sampling stride must be at least 1")]
    ZeroStride,
    #[error("magnitude array is empty")]
    EmptyMagnitudes,
    #[error("geometry contains a non-finite coordinate or magnitude")]
    NonFinite,
    #[error("mesh needs at least one outline")]
    NoOutlines,
    #[error("tessellation failed: {0}")]
    Tessellation(String),
}
