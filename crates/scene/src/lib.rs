pub mod mesh;
pub mod picking;
pub mod registry;

pub use mesh::*;
pub use registry::*;
