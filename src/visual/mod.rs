pub mod panel;
pub mod render;

pub use render::MeshRenderer;
