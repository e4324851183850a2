//! WebGPU rendering module
//!
//! Scenes emit [`DrawCommand`](crate::scene::DrawCommand)s; `shapes` turns
//! them into colored triangles and `pipeline` uploads and draws them.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::tessellate;
pub use vertex::Vertex;
