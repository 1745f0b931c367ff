use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::color::config::BaseConfig;
use crate::color::document::ConfigDocument;
use crate::color::ops::group_transform;
use crate::color::search_path::{materialize, resolve_search_paths, rewrite_search_path};
use crate::color::validate::validate_config_text;
use crate::color::yaml::{flow_list, quote};
use crate::foundation::error::{ShotError, ShotResult};
use crate::graph::operators::ColorOperator;

/// Colorspace family used when a request names none.
pub const DEFAULT_FAMILY: &str = "shotlab";

/// Environment variable consulted when no base config path is given.
pub const OCIO_ENV: &str = "OCIO";

/// Caller-side parameters of a color compilation (the `color` section of a job file).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Base OCIO config. Falls back to `$OCIO`.
    pub config: Option<PathBuf>,
    /// Where the derived config is written.
    pub output: Option<PathBuf>,
    pub working_space: Option<String>,
    /// Name of the new colorspace, look and view.
    pub context: Option<String>,
    pub family: Option<String>,
    /// Explicit active views following the context view.
    pub views: Vec<String>,
    pub environment: BTreeMap<String, String>,
    pub description: Option<String>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ColorSettings {
    /// Base config path, from the settings or the `OCIO` environment variable.
    pub fn config_path(&self) -> ShotResult<PathBuf> {
        if let Some(p) = &self.config {
            return Ok(p.clone());
        }
        match std::env::var_os(OCIO_ENV) {
            Some(v) if !v.is_empty() => Ok(PathBuf::from(v)),
            _ => Err(ShotError::missing_config(format!(
                "no base color config given and ${OCIO_ENV} is not set"
            ))),
        }
    }

    pub fn working_space(&self) -> ShotResult<&str> {
        non_empty(&self.working_space)
            .ok_or_else(|| ShotError::missing_config("working space is not set"))
    }

    pub fn context(&self) -> ShotResult<&str> {
        non_empty(&self.context).ok_or_else(|| ShotError::missing_config("context is not set"))
    }

    pub fn family(&self) -> &str {
        non_empty(&self.family).unwrap_or(DEFAULT_FAMILY)
    }

    /// Output path, defaulting to `<tmp>/shotlab/<context>/config.ocio`.
    pub fn output_path(&self, context: &str) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            std::env::temp_dir()
                .join("shotlab")
                .join(context)
                .join("config.ocio")
        })
    }

    /// Resolve relative paths against `dir`.
    pub fn rebase(&mut self, dir: &Path) {
        for p in [&mut self.config, &mut self.output].into_iter().flatten() {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        }
    }
}

/// A derived color configuration, fully assembled and validated but not yet written.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPipeline {
    /// Operators as they appear in the config (file sources materialized).
    pub operators: Vec<ColorOperator>,
    pub working_space: String,
    pub context: String,
    pub family: String,
    /// Display the context view was added to.
    pub display: String,
    pub active_views: Vec<String>,
    pub environment: BTreeMap<String, String>,
    pub description: Option<String>,
    pub search_paths: Vec<PathBuf>,
    pub config_path: PathBuf,
    pub config_text: String,
}

impl ColorPipeline {
    /// Write the config atomically: temp file next to the target, then rename.
    #[tracing::instrument(skip(self), fields(path = %self.config_path.display()))]
    pub fn publish(&self) -> ShotResult<PathBuf> {
        let path = &self.config_path;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .map_err(|e| ShotError::io(format!("create '{}': {e}", parent.display())))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)
            .map_err(|e| ShotError::io(format!("temp file in '{}': {e}", parent.display())))?;
        tmp.write_all(self.config_text.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| ShotError::io(format!("write '{}': {e}", tmp.path().display())))?;
        tmp.persist(path)
            .map_err(|e| ShotError::io(format!("rename onto '{}': {}", path.display(), e.error)))?;

        tracing::info!("published color config");
        Ok(path.clone())
    }
}

/// Derives per-shot configs from one base config.
#[derive(Clone, Debug)]
pub struct ColorPipelineCompiler {
    base: BaseConfig,
}

impl ColorPipelineCompiler {
    pub fn new(base: BaseConfig) -> Self {
        Self { base }
    }

    /// Load the base config named by `settings` (or `$OCIO`).
    pub fn from_settings(settings: &ColorSettings) -> ShotResult<Self> {
        Ok(Self::new(BaseConfig::load(&settings.config_path()?)?))
    }

    #[tracing::instrument(skip(self, operators, settings), fields(ops = operators.len()))]
    pub fn compile(
        &self,
        operators: &[ColorOperator],
        settings: &ColorSettings,
    ) -> ShotResult<ColorPipeline> {
        let base = &self.base;
        let working_space = settings.working_space()?.to_owned();
        let context = settings.context()?.to_owned();
        let family = settings.family().to_owned();

        let target_display = base
            .target_display()
            .ok_or_else(|| ShotError::invalid_pipeline("base config declares no display"))?
            .to_owned();

        let search_paths = resolve_search_paths(base, operators);
        let operators: Vec<ColorOperator> = operators
            .iter()
            .map(|op| materialize(base.dir(), op))
            .collect();

        let requested = if settings.views.is_empty() {
            &base.active_views
        } else {
            &settings.views
        };
        let mut active_views = vec![context.clone()];
        for v in requested {
            if !active_views.contains(v) {
                active_views.push(v.clone());
            }
        }

        let mut environment = base.environment.clone();
        environment.extend(settings.environment.clone());
        let description = settings
            .description
            .clone()
            .or_else(|| base.description.clone());

        let mut doc = ConfigDocument::parse(&base.text);

        if !settings.environment.is_empty() {
            let mut lines = vec!["environment:".to_owned()];
            lines.extend(
                environment
                    .iter()
                    .map(|(k, v)| format!("  {}: {}", quote(k), quote(v))),
            );
            doc.set_block("environment", lines);
        }
        if let Some(desc) = &settings.description {
            doc.set_block("description", vec![format!("description: {}", quote(desc))]);
        }
        doc.set_block(
            "active_views",
            vec![format!(
                "active_views: {}",
                flow_list(active_views.iter().map(String::as_str))
            )],
        );

        let view = format!(
            "!<View> {{name: {}, colorspace: {}, looks: {}}}",
            quote(&context),
            quote(&working_space),
            quote(&context)
        );
        if !doc.append_nested_entry("displays", &target_display, &view) {
            return Err(ShotError::invalid_pipeline(format!(
                "display '{target_display}' is written inline and cannot be extended"
            )));
        }

        let i = doc.entry_indent("looks");
        let look = vec![
            format!("{i}- !<Look>"),
            format!("{i}  name: {}", quote(&context)),
            format!("{i}  process_space: {}", quote(&working_space)),
            format!(
                "{i}  transform: !<ColorSpaceTransform> {{src: {}, dst: {}}}",
                quote(&working_space),
                quote(&context)
            ),
        ];
        if !doc.append_entries("looks", look) {
            return Err(ShotError::invalid_pipeline(
                "looks block is written inline and cannot be extended",
            ));
        }

        let i = doc.entry_indent("colorspaces");
        let mut colorspace = vec![
            format!("{i}- !<ColorSpace>"),
            format!("{i}  name: {}", quote(&context)),
            format!("{i}  family: {}", quote(&family)),
            format!("{i}  equalitygroup: \"\""),
            format!("{i}  bitdepth: 32f"),
            format!("{i}  isdata: false"),
            format!("{i}  allocation: uniform"),
        ];
        colorspace.extend(group_transform(&operators, &format!("{i}  ")));
        if !doc.append_entries("colorspaces", colorspace) {
            return Err(ShotError::invalid_pipeline(
                "colorspaces block is written inline and cannot be extended",
            ));
        }

        let mut config_text = doc.render();
        if !base.search_paths.is_empty() || !search_paths.is_empty() {
            config_text = rewrite_search_path(&config_text, &search_paths);
        }

        validate_config_text(&config_text)?;
        tracing::debug!(
            %context,
            display = %target_display,
            search_paths = search_paths.len(),
            "assembled color config"
        );

        Ok(ColorPipeline {
            operators,
            config_path: settings.output_path(&context),
            working_space,
            context,
            family,
            display: target_display,
            active_views,
            environment,
            description,
            search_paths,
            config_text,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/compiler.rs"]
mod tests;
