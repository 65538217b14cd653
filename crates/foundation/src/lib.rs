//! Geometry primitives shared by the engine crates: vectors, affine
//! transforms, bounds, generational handles and deterministic float ordering.

pub mod bounds;
pub mod handles;
pub mod math;

pub use bounds::*;
pub use handles::*;
