//! Per-shot orchestration: job files in, compiled color and geometry artifacts out.

use std::path::{Path, PathBuf};

use crate::color::compiler::{ColorPipeline, ColorPipelineCompiler, ColorSettings};
use crate::command::instruction::{
    Instruction, color_instructions, geometry_instructions, to_tokens,
};
use crate::command::render::{DEFAULT_THREADS, RenderCommand};
use crate::external::MediaProbe;
use crate::foundation::core::Family;
use crate::foundation::error::{ShotError, ShotResult};
use crate::geometry::compiler::{
    ChainOptions, CornerOrigin, FrameDimensions, GeometryCompiler, GeometryPlan,
};
use crate::graph::parse::EffectGraph;

/// The `geometry` section of a job file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometrySettings {
    #[serde(flatten)]
    pub dimensions: FrameDimensions,
    /// Probed for the source size when the job gives none.
    #[serde(default)]
    pub source_media: Option<PathBuf>,
    #[serde(flatten)]
    pub chain: ChainOptions,
    #[serde(default)]
    pub corner_origin: CornerOrigin,
}

/// The optional `render` section: where an `oiiotool` run would read and write.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_threads")]
    pub threads: u32,
    #[serde(default)]
    pub debug: bool,
}

fn default_threads() -> u32 {
    DEFAULT_THREADS
}

/// One shot to compile.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShotJob {
    /// Effect JSON exported by the authoring tool.
    pub effect: PathBuf,
    #[serde(default)]
    pub color: Option<ColorSettings>,
    #[serde(default)]
    pub geometry: Option<GeometrySettings>,
    #[serde(default)]
    pub render: Option<RenderSettings>,
}

fn rebase(path: &mut PathBuf, dir: &Path) {
    if path.is_relative() {
        *path = dir.join(&*path);
    }
}

impl ShotJob {
    pub fn from_path(path: &Path) -> ShotResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ShotError::io(format!("read job '{}': {e}", path.display())))?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&text, dir)
    }

    /// Parse a job; relative paths are resolved against `dir`.
    pub fn from_json_str(text: &str, dir: &Path) -> ShotResult<Self> {
        let mut job: Self = serde_json::from_str(text)
            .map_err(|e| ShotError::parse(format!("job file is not valid: {e}")))?;
        job.rebase(dir);
        Ok(job)
    }

    pub fn rebase(&mut self, dir: &Path) {
        rebase(&mut self.effect, dir);
        if let Some(color) = &mut self.color {
            color.rebase(dir);
        }
        if let Some(media) = self
            .geometry
            .as_mut()
            .and_then(|g| g.source_media.as_mut())
        {
            rebase(media, dir);
        }
        if let Some(render) = &mut self.render {
            rebase(&mut render.input, dir);
            rebase(&mut render.output, dir);
        }
    }
}

/// Everything a shot compiles to, still in memory.
#[derive(Clone, Debug)]
pub struct CompiledShot {
    pub graph: EffectGraph,
    pub color: Option<ColorPipeline>,
    pub geometry: Option<GeometryPlan>,
    /// Geometry steps first, then the look, as the renderer applies them.
    pub instructions: Vec<Instruction>,
    pub render: Option<RenderCommand>,
}

impl CompiledShot {
    pub fn tokens(&self) -> Vec<String> {
        to_tokens(&self.instructions)
    }

    /// Write the derived color config, if any. Meant to be the last step of a run.
    pub fn publish(&self) -> ShotResult<Option<PathBuf>> {
        self.color.as_ref().map(ColorPipeline::publish).transpose()
    }

    /// Machine-readable summary for the CLI.
    pub fn report(&self) -> serde_json::Value {
        let color = self.color.as_ref().map(|c| {
            serde_json::json!({
                "context": c.context,
                "working_space": c.working_space,
                "family": c.family,
                "display": c.display,
                "active_views": c.active_views,
                "search_paths": c.search_paths,
                "config_path": c.config_path,
                "operators": c.operators,
            })
        });
        let geometry = self.geometry.as_ref().map(|g| {
            serde_json::json!({
                "matrix": g.matrix.rows(),
                "matrix_csv": g.matrix_csv(),
                "crop": g.crop_rect(),
                "resize": g.resize_target(),
                "corner_origin": g.corner_origin,
                "corner_pin": g.corner_pin.values(),
            })
        });
        let skipped: Vec<String> = self
            .graph
            .skipped
            .iter()
            .map(|s| format!("{}: {}", s.node, s.reason))
            .collect();
        serde_json::json!({
            "color": color,
            "geometry": geometry,
            "skipped": skipped,
            "tokens": self.tokens(),
            "argv": self.render.as_ref().and_then(|r| r.argv().ok()),
        })
    }
}

fn source_from_probe(
    settings: &GeometrySettings,
    probe: Option<&dyn MediaProbe>,
) -> ShotResult<FrameDimensions> {
    let mut dims = settings.dimensions;
    let has_source = dims.source_width.is_some_and(|w| w > 0)
        && dims.source_height.is_some_and(|h| h > 0);
    if has_source {
        return Ok(dims);
    }
    if let (Some(media), Some(probe)) = (&settings.source_media, probe) {
        let size = probe.probe(media)?.display_size();
        tracing::debug!(media = %media.display(), %size, "probed source size");
        dims.source_width = Some(size.width);
        dims.source_height = Some(size.height);
    }
    Ok(dims)
}

/// Parse, compile color and geometry, and assemble instructions. Writes nothing.
#[tracing::instrument(skip(job, probe), fields(effect = %job.effect.display()))]
pub fn compile_shot(job: &ShotJob, probe: Option<&dyn MediaProbe>) -> ShotResult<CompiledShot> {
    if job.color.is_none() && job.geometry.is_none() {
        return Err(ShotError::missing_config(
            "job has neither a color nor a geometry section",
        ));
    }
    let graph = EffectGraph::from_path(&job.effect)?;

    let color = match &job.color {
        Some(settings) => {
            graph.require(Family::Color)?;
            let ops = graph.color_operators()?;
            let compiler = ColorPipelineCompiler::from_settings(settings)?;
            Some(compiler.compile(&ops, settings)?)
        }
        None => None,
    };

    let geometry = match &job.geometry {
        Some(settings) => {
            graph.require(Family::Geometry)?;
            let ops = graph.geometry_operators()?;
            let dims = source_from_probe(settings, probe)?;
            let compiler = GeometryCompiler::new(settings.chain, settings.corner_origin);
            Some(compiler.compile(&ops, &dims)?)
        }
        None => None,
    };

    let mut instructions = Vec::new();
    if let Some(plan) = &geometry {
        instructions.extend(geometry_instructions(plan));
    }
    if let Some(pipeline) = &color {
        instructions.extend(color_instructions(pipeline));
    }

    let render = job.render.as_ref().map(|r| {
        RenderCommand::new(&r.input, &r.output)
            .with_threads(r.threads)
            .with_debug(r.debug)
            .with_geometry(geometry.as_ref().map(geometry_instructions).unwrap_or_default())
            .with_color(color.as_ref().map(color_instructions).unwrap_or_default())
    });

    tracing::info!(
        color = color.is_some(),
        geometry = geometry.is_some(),
        skipped = graph.skipped.len(),
        "compiled shot"
    );
    Ok(CompiledShot {
        graph,
        color,
        geometry,
        instructions,
        render,
    })
}
