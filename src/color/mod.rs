//! Derive per-shot OCIO configs that express an operator chain as a named look.
//!
//! The base config is never modified. Its text is edited line-wise so that untouched
//! blocks keep their formatting, and the result is validated before it can be published.

pub mod compiler;
pub mod config;
pub mod document;
pub mod ops;
pub mod search_path;
pub mod validate;
pub(crate) mod yaml;
