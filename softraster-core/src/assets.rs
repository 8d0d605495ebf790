/// Wavefront OBJ meshes and image textures
use std::path::Path;

use nalgebra::{Point2, Point3};
use nom::{
    bytes::complete::tag,
    character::complete::{char, i64, space1},
    combinator::opt,
    multi::separated_list1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::AssetError;
use crate::geometry::Mesh;
use crate::texture::Texture;

/// One `v/vt/vn` reference of a face, indices as written (1-based or negative)
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceVertex {
    position: i64,
    uv: Option<i64>,
}

fn position(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = terminated(tag("v"), space1)(input)?;
    let (input, (x, _, y, _, z)) = tuple((float, space1, float, space1, float))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn texture_coord(input: &str) -> IResult<&str, Point2<f32>> {
    let (input, _) = terminated(tag("vt"), space1)(input)?;
    // v is optional and defaults to 0
    let (input, (u, v)) = tuple((float, opt(preceded(space1, float))))(input)?;
    Ok((input, Point2::new(u, v.unwrap_or(0.0))))
}

fn face_vertex(input: &str) -> IResult<&str, FaceVertex> {
    let (input, position) = i64(input)?;
    let (input, uv) = opt(preceded(char('/'), opt(i64)))(input)?;
    // Normal index, unused
    let (input, _) = opt(preceded(char('/'), i64))(input)?;
    Ok((
        input,
        FaceVertex {
            position,
            uv: uv.flatten(),
        },
    ))
}

fn face(input: &str) -> IResult<&str, Vec<FaceVertex>> {
    let (input, _) = terminated(tag("f"), space1)(input)?;
    separated_list1(space1, face_vertex)(input)
}

/// Resolve a 1-based or negative (relative) OBJ index against `len` entries
fn resolve(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len as i64 + index
    } else {
        index - 1
    };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

/// Parse OBJ text into a flat, de-indexed triangle list.
///
/// Polygons are fan-triangulated. Face vertices without a `vt` index get
/// UV (0, 0). Normals, groups, materials and smoothing are ignored.
pub fn parse_obj(input: &str) -> Result<Mesh, AssetError> {
    let mut positions = Vec::new();
    let mut texture_coords = Vec::new();
    let mut mesh_positions = Vec::new();
    let mut mesh_uvs = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        let error = |message: String| AssetError::Obj {
            line: number + 1,
            message,
        };

        match line.split_whitespace().next() {
            Some("v") => {
                let (_, point) = position(line).map_err(|e| error(format!("{e}")))?;
                positions.push(point);
            }
            Some("vt") => {
                let (_, uv) = texture_coord(line).map_err(|e| error(format!("{e}")))?;
                texture_coords.push(uv);
            }
            Some("f") => {
                let (_, corners) = face(line).map_err(|e| error(format!("{e}")))?;
                if corners.len() < 3 {
                    return Err(error(format!("face has {} vertices", corners.len())));
                }

                let mut resolved = Vec::with_capacity(corners.len());
                for corner in &corners {
                    let point = resolve(corner.position, positions.len())
                        .map(|i| positions[i])
                        .ok_or_else(|| {
                            error(format!("position index {} out of range", corner.position))
                        })?;
                    let uv = match corner.uv {
                        Some(index) => resolve(index, texture_coords.len())
                            .map(|i| texture_coords[i])
                            .ok_or_else(|| error(format!("texture index {index} out of range")))?,
                        None => Point2::origin(),
                    };
                    resolved.push((point, uv));
                }

                for i in 1..resolved.len() - 1 {
                    for (point, uv) in [resolved[0], resolved[i], resolved[i + 1]] {
                        mesh_positions.push(point);
                        mesh_uvs.push(uv);
                    }
                }
            }
            _ => {}
        }
    }

    Mesh::from_parts(mesh_positions, mesh_uvs)
}

/// Load an OBJ file from disk
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_obj(&contents)?;
    log::info!("Loaded {} triangles from {:?}", mesh.triangle_count(), path);
    Ok(mesh)
}

fn texture_from_image(image: image::DynamicImage) -> Result<Texture, AssetError> {
    // Bottom row first, so texel y follows UV v
    let rgba = image.flipv().to_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    Texture::from_rgba8(width, height, rgba.as_raw())
        .ok_or(AssetError::TextureSize { width, height })
}

/// Load a texture (TGA, PNG or BMP) from disk
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<Texture, AssetError> {
    let path = path.as_ref();
    let texture = texture_from_image(image::open(path)?)?;
    log::info!(
        "Loaded texture {}x{} from {:?}",
        texture.width(),
        texture.height(),
        path
    );
    Ok(texture)
}

/// Decode a texture from an in-memory image file
pub fn load_texture_from_memory(bytes: &[u8]) -> Result<Texture, AssetError> {
    texture_from_image(image::load_from_memory(bytes)?)
}
