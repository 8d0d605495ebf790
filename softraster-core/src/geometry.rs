/// Mesh storage: flat position and UV lists consumed in triples
use nalgebra::{Point2, Point3};

use crate::error::AssetError;

/// A 3D vertex with position and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub uv: Point2<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, u: f32, v: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            uv: Point2::new(u, v),
        }
    }
}

/// A triangle mesh without an index buffer.
///
/// Every three consecutive entries of `positions` (and the matching entries
/// of `uvs`) form one triangle.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    positions: Vec<Point3<f32>>,
    uvs: Vec<Point2<f32>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * 3),
            uvs: Vec::with_capacity(triangles * 3),
        }
    }

    /// Build a mesh from parallel position and UV lists
    pub fn from_parts(
        positions: Vec<Point3<f32>>,
        uvs: Vec<Point2<f32>>,
    ) -> Result<Self, AssetError> {
        if positions.len() != uvs.len() {
            return Err(AssetError::MismatchedUvs {
                positions: positions.len(),
                uvs: uvs.len(),
            });
        }
        if positions.len() % 3 != 0 {
            log::warn!(
                "Mesh has {} vertices, trailing {} ignored",
                positions.len(),
                positions.len() % 3
            );
        }
        Ok(Self { positions, uvs })
    }

    pub fn add_triangle(&mut self, v0: Vertex, v1: Vertex, v2: Vertex) {
        for vertex in [v0, v1, v2] {
            self.push_vertex(vertex.position, vertex.uv);
        }
    }

    fn push_vertex(&mut self, position: Point3<f32>, uv: Point2<f32>) {
        self.positions.push(position);
        self.uvs.push(uv);
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn uvs(&self) -> &[Point2<f32>] {
        &self.uvs
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Iterate complete triangles as (positions, uvs); a trailing partial triple is skipped
    pub fn triangles(
        &self,
    ) -> impl Iterator<Item = ([Point3<f32>; 3], [Point2<f32>; 3])> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.uvs.chunks_exact(3))
            .map(|(p, uv)| ([p[0], p[1], p[2]], [uv[0], uv[1], uv[2]]))
    }

    /// Create a textured cube, each face mapped to the full texture
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Corners of each face counter-clockwise seen from outside
        let faces: [[[f32; 3]; 4]; 6] = [
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],     // front
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]], // back
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],     // top
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], // bottom
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],     // right
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], // left
        ];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        for face in &faces {
            let corner = |i: usize| {
                Vertex::new(face[i][0], face[i][1], face[i][2], uvs[i][0], uvs[i][1])
            };
            mesh.add_triangle(corner(0), corner(1), corner(2));
            mesh.add_triangle(corner(0), corner(2), corner(3));
        }

        mesh
    }
}
