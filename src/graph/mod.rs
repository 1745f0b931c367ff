//! Effect graph parsing: classification, aliasing and schema sanitization of raw
//! effect nodes into ordered color and geometry operator lists.

pub mod node;
pub mod operators;
pub mod parse;
pub mod registry;
