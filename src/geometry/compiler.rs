use std::fmt;

use crate::foundation::core::{Affine, Point, Size};
use crate::foundation::error::{ShotError, ShotResult};
use crate::geometry::matrix::{self, AffineMatrix};
use crate::graph::operators::GeometryOperator;

impl GeometryOperator {
    /// `T(translate) · C(center) · S(scale) · R(rotate) · C(-center)`.
    ///
    /// The order is part of the contract with the authoring tool; changing it changes
    /// every composed result.
    pub fn to_affine(&self) -> Affine {
        matrix::translate(self.translate)
            * matrix::translate(self.center)
            * matrix::scale(self.scale)
            * matrix::rotate(self.rotate)
            * matrix::translate(-self.center)
    }
}

/// Coordinate-convention switches for chain composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChainOptions {
    /// Mirror horizontally around the source width.
    pub flip: bool,
    /// Mirror vertically around the source height (lower-left vs upper-left origin).
    pub flop: bool,
    /// Apply operators latest-authored first.
    pub reverse_chain: bool,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            flip: false,
            flop: true,
            reverse_chain: true,
        }
    }
}

impl ChainOptions {
    /// No mirroring, reversed chain.
    pub fn none() -> Self {
        Self {
            flip: false,
            flop: false,
            reverse_chain: true,
        }
    }
}

/// Which raster origin the corner-pin quad is expressed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerOrigin {
    /// Corners `(0,0) (w,0) (0,h) (w,h)`; what the renderer's perspective filter reads.
    #[default]
    LowerLeft,
    /// Corners `(0,h) (w,h) (0,0) (w,0)`.
    UpperLeft,
}

impl CornerOrigin {
    fn corners(self, size: Size) -> [Point; 4] {
        let w = f64::from(size.width);
        let h = f64::from(size.height);
        match self {
            Self::LowerLeft => [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(0.0, h),
                Point::new(w, h),
            ],
            Self::UpperLeft => [
                Point::new(0.0, h),
                Point::new(w, h),
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
            ],
        }
    }
}

/// Eight corner coordinates `x0 y0 x1 y1 x2 y2 x3 y3`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CornerPin(pub [f64; 8]);

impl CornerPin {
    pub fn compute(m: &AffineMatrix, size: Size, origin: CornerOrigin) -> Self {
        let mut out = [0.0; 8];
        for (i, corner) in origin.corners(size).into_iter().enumerate() {
            let p = m.project(corner);
            out[2 * i] = p.x;
            out[2 * i + 1] = p.y;
        }
        Self(out)
    }

    pub fn values(&self) -> &[f64; 8] {
        &self.0
    }
}

/// Crop/pad rectangle at source resolution matching the destination aspect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FitRect {
    pub width: u32,
    pub height: u32,
    pub x: i64,
    pub y: i64,
}

impl FitRect {
    pub fn fit(source: Size, dest: Size) -> Self {
        let src_aspect = source.aspect();
        let dst_aspect = dest.aspect();
        let (mut width, mut height) = (source.width, source.height);
        let (mut x, mut y) = (0i64, 0i64);

        if src_aspect > dst_aspect {
            height = (f64::from(source.width) / dst_aspect).round() as u32;
            y = (i64::from(height) - i64::from(source.height)) / 2;
        } else if src_aspect < dst_aspect {
            width = (f64::from(source.height) * dst_aspect).round() as u32;
            x = (i64::from(width) - i64::from(source.width)) / 2;
        }
        Self {
            width,
            height,
            x,
            y,
        }
    }
}

impl fmt::Display for FitRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}-{}-{}", self.width, self.height, self.x, self.y)
    }
}

/// Source and destination sizes as supplied by the caller; all four are required.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameDimensions {
    pub source_width: Option<u32>,
    pub source_height: Option<u32>,
    pub dest_width: Option<u32>,
    pub dest_height: Option<u32>,
}

impl FrameDimensions {
    pub fn new(source: Size, dest: Size) -> Self {
        Self {
            source_width: Some(source.width),
            source_height: Some(source.height),
            dest_width: Some(dest.width),
            dest_height: Some(dest.height),
        }
    }

    /// Resolve into `(source, dest)`. Zero counts as missing; nothing is defaulted.
    pub fn resolve(&self) -> ShotResult<(Size, Size)> {
        fn req(v: Option<u32>, what: &str) -> ShotResult<u32> {
            v.filter(|v| *v > 0)
                .ok_or_else(|| ShotError::missing_dimensions(format!("missing {what}")))
        }
        let source = Size::new(
            req(self.source_width, "source width")?,
            req(self.source_height, "source height")?,
        );
        let dest = Size::new(
            req(self.dest_width, "destination width")?,
            req(self.dest_height, "destination height")?,
        );
        Ok((source, dest))
    }
}

/// Compose the operator chain into a single matrix.
pub fn compose_chain(ops: &[GeometryOperator], source: Size, opts: ChainOptions) -> AffineMatrix {
    let w = f64::from(source.width);
    let h = f64::from(source.height);

    let mut chain: Vec<Affine> = Vec::with_capacity(ops.len() + 4);
    if opts.flip {
        chain.push(matrix::flip(w));
    }
    if opts.flop {
        chain.push(matrix::flop(h));
    }
    if opts.reverse_chain {
        chain.extend(ops.iter().rev().map(GeometryOperator::to_affine));
    } else {
        chain.extend(ops.iter().map(GeometryOperator::to_affine));
    }
    if opts.flop {
        chain.push(matrix::flop(h));
    }
    if opts.flip {
        chain.push(matrix::flip(w));
    }

    let composed = chain.into_iter().fold(Affine::IDENTITY, |acc, m| acc * m);
    AffineMatrix::from(composed)
}

/// Compiled reprojection parameters for one shot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryPlan {
    pub matrix: AffineMatrix,
    pub source: Size,
    pub dest: Size,
    pub fit: FitRect,
    pub corner_origin: CornerOrigin,
    pub corner_pin: CornerPin,
}

impl GeometryPlan {
    /// Transposed, flattened matrix as consumed by matrix-driven warps.
    pub fn matrix_csv(&self) -> String {
        self.matrix.transpose().to_csv()
    }

    pub fn crop_rect(&self) -> String {
        self.fit.to_string()
    }

    pub fn resize_target(&self) -> String {
        self.dest.to_string()
    }

    /// Corner pin for either origin convention.
    pub fn corner_pin_for(&self, origin: CornerOrigin) -> CornerPin {
        CornerPin::compute(&self.matrix, self.source, origin)
    }
}

/// Compiles ordered geometry operators into a [`GeometryPlan`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryCompiler {
    pub chain: ChainOptions,
    pub corner_origin: CornerOrigin,
}

impl GeometryCompiler {
    pub fn new(chain: ChainOptions, corner_origin: CornerOrigin) -> Self {
        Self {
            chain,
            corner_origin,
        }
    }

    #[tracing::instrument(skip(self, ops), fields(ops = ops.len()))]
    pub fn compile(
        &self,
        ops: &[GeometryOperator],
        dims: &FrameDimensions,
    ) -> ShotResult<GeometryPlan> {
        let (source, dest) = dims.resolve()?;
        let matrix = compose_chain(ops, source, self.chain);
        let fit = FitRect::fit(source, dest);
        let corner_pin = CornerPin::compute(&matrix, source, self.corner_origin);
        tracing::debug!(%source, %dest, crop = %fit, "compiled geometry plan");
        Ok(GeometryPlan {
            matrix,
            source,
            dest,
            fit,
            corner_origin: self.corner_origin,
            corner_pin,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/compiler.rs"]
mod tests;
