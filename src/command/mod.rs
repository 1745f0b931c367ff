//! Command-line assembly for external image tools. Pure: nothing here spawns a process.

pub mod instruction;
pub mod render;
