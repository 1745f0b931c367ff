//! Reprojection: operator-chain composition, aspect fitting and corner pins.

pub mod compiler;
pub mod matrix;
