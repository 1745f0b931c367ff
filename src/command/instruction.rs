use std::path::PathBuf;

use crate::color::compiler::ColorPipeline;
use crate::foundation::core::Size;
use crate::geometry::compiler::{FitRect, GeometryPlan};

/// One image-processing step, renderable as command-line tokens for `oiiotool`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Apply the look `look` through the config at `config_path`.
    ApplyLook {
        config_path: PathBuf,
        from: String,
        to: String,
        look: String,
    },
    /// Matrix warp; `matrix_csv` is the transposed, flattened 3x3 matrix.
    Warp { matrix_csv: String },
    Crop(FitRect),
    Fullsize(FitRect),
    Resize(Size),
}

impl Instruction {
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::ApplyLook {
                config_path,
                from,
                to,
                look,
            } => vec![
                "--colorconfig".to_owned(),
                config_path.display().to_string(),
                format!("--ociolook:from=\"{from}\":to=\"{to}\""),
                look.clone(),
            ],
            Self::Warp { matrix_csv } => vec![
                "--warp:filter=cubic:recompute_roi=1".to_owned(),
                matrix_csv.clone(),
            ],
            Self::Crop(rect) => vec!["--crop".to_owned(), rect.to_string()],
            Self::Fullsize(rect) => vec!["--fullsize".to_owned(), rect.to_string()],
            Self::Resize(size) => vec!["--resize".to_owned(), size.to_string()],
        }
    }
}

/// Look application in and out of the working space.
pub fn color_instructions(pipeline: &ColorPipeline) -> Vec<Instruction> {
    vec![Instruction::ApplyLook {
        config_path: pipeline.config_path.clone(),
        from: pipeline.working_space.clone(),
        to: pipeline.working_space.clone(),
        look: pipeline.context.clone(),
    }]
}

/// Warp, crop, fullsize, resize.
pub fn geometry_instructions(plan: &GeometryPlan) -> Vec<Instruction> {
    vec![
        Instruction::Warp {
            matrix_csv: plan.matrix_csv(),
        },
        Instruction::Crop(plan.fit),
        Instruction::Fullsize(plan.fit),
        Instruction::Resize(plan.dest),
    ]
}

/// Concatenated tokens of `instructions`.
pub fn to_tokens(instructions: &[Instruction]) -> Vec<String> {
    instructions.iter().flat_map(Instruction::tokens).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/command/instruction.rs"]
mod tests;
