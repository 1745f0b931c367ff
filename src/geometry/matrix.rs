//! 3x3 homogeneous matrices and the elementary transforms used by reprojection.

use std::fmt::Write as _;

use crate::foundation::core::{Affine, Point, Vec2};

/// Row-major 3x3 homogeneous matrix.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AffineMatrix(pub [[f64; 3]; 3]);

impl AffineMatrix {
    pub const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    pub fn transpose(&self) -> Self {
        let m = &self.0;
        Self([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Row-major product `self · rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        Self(out)
    }

    /// Map `(x, y, 1)` and divide by the resulting homogeneous coordinate.
    pub fn project(&self, p: Point) -> Point {
        let m = &self.0;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2];
        let w = m[2][0] * p.x + m[2][1] * p.y + m[2][2];
        Point::new(x / w, y / w)
    }

    /// The nine values, row by row, comma separated.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (i, v) in self.0.iter().flatten().enumerate() {
            if i > 0 {
                out.push(',');
            }
            // `{:?}` keeps a decimal point on integral values ("1.0").
            let _ = write!(out, "{v:?}");
        }
        out
    }

    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for AffineMatrix {
    fn from(a: Affine) -> Self {
        let [a, b, c, d, e, f] = a.as_coeffs();
        Self([[a, c, e], [b, d, f], [0.0, 0.0, 1.0]])
    }
}

pub fn translate(t: Vec2) -> Affine {
    Affine::translate(t)
}

/// Counter-clockwise rotation by `degrees`.
pub fn rotate(degrees: f64) -> Affine {
    Affine::rotate(degrees.to_radians())
}

pub fn scale(s: Vec2) -> Affine {
    Affine::scale_non_uniform(s.x, s.y)
}

/// Horizontal mirror anchored at `width`: `x -> width - x`.
pub fn flip(width: f64) -> Affine {
    translate(Vec2::new(width, 0.0)) * scale(Vec2::new(-1.0, 1.0))
}

/// Vertical mirror anchored at `height`: `y -> height - y`.
pub fn flop(height: f64) -> Affine {
    translate(Vec2::new(0.0, height)) * scale(Vec2::new(1.0, -1.0))
}
