pub mod affine;
pub mod precision;
pub mod vec;

pub use affine::*;
pub use precision::*;
pub use vec::*;
