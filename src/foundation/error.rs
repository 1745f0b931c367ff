use std::fmt;

/// Convenience result type used across shotlab.
pub type ShotResult<T> = Result<T, ShotError>;

/// Identifies the effect node (and optionally the attribute) an error refers to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeRef {
    /// Class name as authored (before normalization).
    pub class: String,
    /// Authoring-tool track index, when it could be read.
    pub track_index: Option<i64>,
    /// Offending attribute, when the error concerns a single attribute.
    pub attribute: Option<String>,
}

impl NodeRef {
    /// Reference a node by class and track index.
    pub fn new(class: impl Into<String>, track_index: Option<i64>) -> Self {
        Self {
            class: class.into(),
            track_index,
            attribute: None,
        }
    }

    /// Same node, narrowed to `attribute`.
    pub fn attr(&self, attribute: impl Into<String>) -> Self {
        Self {
            attribute: Some(attribute.into()),
            ..self.clone()
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = if self.class.is_empty() {
            "<unknown>"
        } else {
            self.class.as_str()
        };
        write!(f, "class '{class}'")?;
        match self.track_index {
            Some(idx) => write!(f, " track {idx}")?,
            None => write!(f, " track <missing>")?,
        }
        if let Some(attr) = &self.attribute {
            write!(f, " attribute '{attr}'")?;
        }
        Ok(())
    }
}

/// Error type for every stage of a shot compilation.
#[derive(thiserror::Error, Debug)]
pub enum ShotError {
    /// Malformed or undecodable effect input. Aborts the whole run.
    #[error("parse failure: {0}")]
    Parse(String),

    /// A node is structurally incomplete (missing class/index/attributes).
    #[error("invalid effect file: {node}: {reason}")]
    InvalidEffectFile {
        /// Offending node.
        node: NodeRef,
        /// What was wrong with it.
        reason: String,
    },

    /// A node violates a semantic rule (e.g. a CDL carrying a source path).
    #[error("misconfigured node: {node}: {reason}")]
    MisconfiguredNode {
        /// Offending node.
        node: NodeRef,
        /// Violated rule.
        reason: String,
    },

    /// A required color-management parameter is absent.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// A required raster size is absent.
    #[error("missing dimensions: {0}")]
    MissingDimensions(String),

    /// The assembled color configuration failed validation.
    #[error("invalid color pipeline: {0}")]
    InvalidColorPipeline(String),

    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShotError {
    /// Build a [`ShotError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`ShotError::InvalidEffectFile`] value.
    pub fn invalid_effect(node: NodeRef, reason: impl Into<String>) -> Self {
        Self::InvalidEffectFile {
            node,
            reason: reason.into(),
        }
    }

    /// Build a [`ShotError::MisconfiguredNode`] value.
    pub fn misconfigured(node: NodeRef, reason: impl Into<String>) -> Self {
        Self::MisconfiguredNode {
            node,
            reason: reason.into(),
        }
    }

    /// Build a [`ShotError::MissingConfiguration`] value.
    pub fn missing_config(msg: impl Into<String>) -> Self {
        Self::MissingConfiguration(msg.into())
    }

    /// Build a [`ShotError::MissingDimensions`] value.
    pub fn missing_dimensions(msg: impl Into<String>) -> Self {
        Self::MissingDimensions(msg.into())
    }

    /// Build a [`ShotError::InvalidColorPipeline`] value.
    pub fn invalid_pipeline(msg: impl Into<String>) -> Self {
        Self::InvalidColorPipeline(msg.into())
    }

    /// Build a [`ShotError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
