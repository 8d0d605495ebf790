/// Bounding-box triangle rasterizer with depth test and texture lookup
use nalgebra::{Point2, Point3, Vector2};
use rayon::prelude::*;

use crate::buffer::{ColorBuffer, DepthBuffer};
use crate::texture::Texture;

/// Barycentric denominators below this (twice the squared area, in pixels)
/// are treated as collinear
const AREA_EPSILON: f32 = 1e-6;

/// A triangle after projection: x,y in pixels, z in NDC depth, UVs in texels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub positions: [Point3<f32>; 3],
    pub uvs: [Point2<f32>; 3],
}

/// What happened to a triangle handed to [`fill_triangle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// Rasterized; `pixels` fragments passed the depth test
    Drawn { pixels: usize },
    /// Clamped bounding box spans the whole width or height of the target
    FullExtent,
    /// Zero-area, collinear or non-finite vertices
    Degenerate,
    /// Zero-sized target, or color and depth buffers of different size
    NoTarget,
}

/// Precomputed barycentric basis of a screen-space triangle
#[derive(Debug, Clone, Copy)]
pub struct Barycentric {
    origin: Point2<f32>,
    v0: Vector2<f32>,
    v1: Vector2<f32>,
    d00: f32,
    d01: f32,
    d11: f32,
    denom: f32,
}

impl Barycentric {
    /// `None` for collinear or non-finite triangles
    pub fn new(p0: Point2<f32>, p1: Point2<f32>, p2: Point2<f32>) -> Option<Self> {
        let v0 = p1 - p0;
        let v1 = p2 - p0;
        let d00 = v0.dot(&v0);
        let d01 = v0.dot(&v1);
        let d11 = v1.dot(&v1);
        let denom = d00 * d11 - d01 * d01;

        if !denom.is_finite() || denom.abs() < AREA_EPSILON {
            return None;
        }

        Some(Self {
            origin: p0,
            v0,
            v1,
            d00,
            d01,
            d11,
            denom,
        })
    }

    /// Weights `(u, v, w)` of `p0`, `p1`, `p2`; they always sum to 1
    pub fn weights(&self, point: &Point2<f32>) -> (f32, f32, f32) {
        let v2 = point - self.origin;
        let d20 = v2.dot(&self.v0);
        let d21 = v2.dot(&self.v1);
        let v = (self.d11 * d20 - self.d01 * d21) / self.denom;
        let w = (self.d00 * d21 - self.d01 * d20) / self.denom;
        (1.0 - v - w, v, w)
    }
}

fn is_inside(u: f32, v: f32, w: f32) -> bool {
    [u, v, w].iter().all(|weight| (0.0..=1.0).contains(weight))
}

/// Rasterize one triangle into `color`, keeping the nearest fragment per pixel in `depth`.
///
/// Pixels are sampled at their centers over the half-open clamped bounding
/// box `[min, max)`. Rows are shaded in parallel; each worker owns one row
/// slice of both buffers.
pub fn fill_triangle(
    color: &mut ColorBuffer,
    triangle: &ScreenTriangle,
    texture: &Texture,
    depth: &mut DepthBuffer,
) -> TriangleOutcome {
    let (width, height) = (color.width(), color.height());
    if width == 0 || height == 0 || depth.width() != width || depth.height() != height {
        return TriangleOutcome::NoTarget;
    }

    let [p0, p1, p2] = triangle.positions;
    let [uv0, uv1, uv2] = triangle.uvs;
    if [p0, p1, p2].iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return TriangleOutcome::Degenerate;
    }

    // Bounding box in screen space, clamped to the target
    let last_x = (width - 1) as f32;
    let last_y = (height - 1) as f32;
    let min = p0.inf(&p1).inf(&p2);
    let max = p0.sup(&p1).sup(&p2);
    let (min_x, max_x) = (min.x.clamp(0.0, last_x), max.x.clamp(0.0, last_x));
    let (min_y, max_y) = (min.y.clamp(0.0, last_y), max.y.clamp(0.0, last_y));

    // Huge or off-screen triangles clamp to the full extent and smear across the target
    if (min_x == 0.0 && max_x == last_x) || (min_y == 0.0 && max_y == last_y) {
        return TriangleOutcome::FullExtent;
    }

    let Some(basis) = Barycentric::new(p0.xy(), p1.xy(), p2.xy()) else {
        return TriangleOutcome::Degenerate;
    };

    // x < max_x over integers is x < ceil(max_x)
    let (x_start, x_end) = (min_x as usize, max_x.ceil() as usize);
    let (y_start, y_end) = (min_y as usize, max_y.ceil() as usize);

    let pixels = color
        .rows_mut(y_start, y_end)
        .par_chunks_mut(width)
        .zip(depth.rows_mut(y_start, y_end).par_chunks_mut(width))
        .enumerate()
        .map(|(row, (color_row, depth_row))| {
            let y = y_start + row;
            let mut written = 0;

            for x in x_start..x_end {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let (u, v, w) = basis.weights(&center);
                if !is_inside(u, v, w) {
                    continue;
                }

                let z = u * p0.z + v * p1.z + w * p2.z;
                let (Some(depth_cell), Some(color_cell)) =
                    (depth_row.get_mut(x), color_row.get_mut(x))
                else {
                    continue;
                };

                if z < *depth_cell {
                    *depth_cell = z;
                    let uv = uv0.coords * u + uv1.coords * v + uv2.coords * w;
                    *color_cell = texture.sample(uv.x, uv.y);
                    written += 1;
                }
            }

            written
        })
        .sum();

    TriangleOutcome::Drawn { pixels }
}
