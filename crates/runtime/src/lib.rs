pub mod metrics;
pub mod yield_now;

pub use metrics::*;
pub use yield_now::*;
