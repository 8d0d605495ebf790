/// Error types for the camera, asset loading and configuration
use std::path::PathBuf;
use thiserror::Error;

/// Camera parameters that cannot produce a usable matrix
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    /// Look direction is zero-length or parallel to `up`
    #[error("degenerate view: eye, center and up do not define an orthonormal basis")]
    DegenerateView,

    /// fov/aspect/near/far produced a non-finite projection
    #[error("invalid projection: fov={fov}, aspect={aspect}, near={near}, far={far}")]
    InvalidProjection {
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

/// Failure to load a mesh or texture from disk
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OBJ line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("mesh has {positions} positions but {uvs} UVs")]
    MismatchedUvs { positions: usize, uvs: usize },

    #[error("decoded texture {width}x{height} has the wrong number of texels")]
    TextureSize { width: usize, height: usize },

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure to load the render configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
