//! shotlab compiles per-shot visual-effects metadata into the artifacts a plate
//! conform needs.
//!
//! An authoring tool exports, per shot, an ordered list of color and reprojection
//! operations. shotlab turns that list into:
//!
//! - an OCIO config derived from a show config, carrying the color chain as a named look
//!   (plus the matching colorspace and view), and
//! - the numbers a reprojection needs: a composed affine matrix, an aspect-preserving
//!   crop/resize and a corner-pin quad.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: effect JSON -> [`EffectGraph`] (classified, aliased, ordered by track)
//! 2. **Color**: [`ColorOperator`]s + [`BaseConfig`] -> [`ColorPipeline`] (validated text)
//! 3. **Geometry**: [`GeometryOperator`]s + sizes -> [`GeometryPlan`]
//! 4. **Assemble**: plans -> [`Instruction`]s / `oiiotool` tokens
//!
//! Nothing runs an external process. The only write is [`ColorPipeline::publish`], which
//! is atomic and meant to be the final step of a run.
#![forbid(unsafe_code)]

mod color;
mod command;
mod external;
mod foundation;
mod geometry;
mod graph;
mod pipeline;

pub use color::compiler::{
    ColorPipeline, ColorPipelineCompiler, ColorSettings, DEFAULT_FAMILY, OCIO_ENV,
};
pub use color::config::BaseConfig;
pub use color::document::ConfigDocument;
pub use color::ops::{group_transform, render_transform};
pub use color::search_path::{
    materialize, resolve_entry, resolve_search_paths, rewrite_search_path,
};
pub use color::validate::validate_config_text;
pub use command::instruction::{Instruction, color_instructions, geometry_instructions, to_tokens};
pub use command::render::{DEFAULT_THREADS, RenderCommand, perspective_filter};
pub use external::{MediaProbe, ProbeInfo, SlateRaster, SlateRenderer};
pub use foundation::core::{Affine, Direction, Family, Point, Size, Vec2};
pub use foundation::error::{NodeRef, ShotError, ShotResult};
pub use geometry::compiler::{
    ChainOptions, CornerOrigin, CornerPin, FitRect, FrameDimensions, GeometryCompiler,
    GeometryPlan, compose_chain,
};
pub use geometry::matrix::AffineMatrix;
pub use graph::node::{CLASS_KEY, DATA_KEY, EffectNode, INDEX_KEY, decode_nodes};
pub use graph::operators::{ColorOperator, GeometryOperator};
pub use graph::parse::{EffectGraph, ParsedNode, SkippedNode};
pub use graph::registry::{OperatorClass, canonical_attribute, normalize_class_name};
pub use pipeline::{
    CompiledShot, GeometrySettings, RenderSettings, ShotJob, compile_shot,
};
