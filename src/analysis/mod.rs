//! Term analysis for Termsmith.
//!
//! String values are analyzed before they become index terms. Analysis here
//! works on whole terms rather than token streams: one input term produces
//! exactly one output term, so compound terms keep a single value per
//! component.

pub mod analyzer;

// Re-export commonly used types
pub use analyzer::*;
