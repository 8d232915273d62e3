//! Utility modules for Termsmith.

pub mod bits;
