/// Softraster Core Library - camera, rasterizer and frame driver
///
/// This library projects a textured triangle mesh through a perspective
/// camera and rasterizes it into a CPU color buffer with a depth test.
/// It has no window or terminal dependencies; see `softraster-terminal`
/// for an interactive frame loop.

pub mod assets;
pub mod buffer;
pub mod camera;
pub mod config;
pub mod context;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod texture;

// Re-export commonly used types
pub use buffer::{Color, ColorBuffer, DepthBuffer, PixelBuffer};
pub use camera::Camera;
pub use config::RenderConfig;
pub use context::{FrameStats, RenderContext};
pub use controls::{Key, KeyState};
pub use error::{AssetError, CameraError, ConfigError};
pub use geometry::{Mesh, Vertex};
pub use raster::{fill_triangle, ScreenTriangle, TriangleOutcome};
pub use texture::Texture;
