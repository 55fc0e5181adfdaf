//! Chart and report specifications plus the transform/frequency vocabulary
//! they are written in.

pub mod types;

pub use types::*;
