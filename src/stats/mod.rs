//! Spatial statistics
//!
//! Second-order point pattern analysis: Ripley's K-function, its edge
//! correction, and classification against simulated CSR envelopes.

pub mod edge;
pub mod kfunction;

pub use kfunction::{analyze, analyze_points, classify, KFunctionResult, KOptions, PointPattern};
