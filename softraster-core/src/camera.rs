/// Perspective camera: view, projection and view-projection matrices
///
/// Matrices follow nalgebra's column-vector convention: a world point is
/// transformed as `M * p`. "View then projection" is therefore stored as
/// `projection_matrix * view_matrix`.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::CameraError;

/// Below this length a look direction or side vector cannot be normalized
const BASIS_EPSILON: f32 = 1e-6;

/// Homogeneous `w` values closer to zero than this are not divided
const W_EPSILON: f32 = 1e-6;

/// Camera configuration for 3D rendering
///
/// The derived matrices are not dirty-tracked. After mutating the public
/// fields directly, call [`Camera::update_view_matrix`] and/or
/// [`Camera::update_projection_matrix`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub center: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
    viewprojection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            eye: Point3::new(0.0, 10.0, 20.0),
            center: Point3::new(0.0, 10.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 45.0,
            aspect: 1.0,
            near_plane: 0.01,
            far_plane: 10000.0,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
            viewprojection_matrix: Matrix4::identity(),
        };
        // The defaults above always form a valid basis and frustum
        let _ = camera.update_view_matrix();
        let _ = camera.update_projection_matrix();
        camera
    }

    /// Set eye, center and up, then rebuild the view matrix
    pub fn look_at(
        &mut self,
        eye: Point3<f32>,
        center: Point3<f32>,
        up: Vector3<f32>,
    ) -> Result<(), CameraError> {
        self.eye = eye;
        self.center = center;
        self.up = up;
        self.update_view_matrix()
    }

    /// Set the projection parameters (fov in degrees), then rebuild the projection matrix
    pub fn perspective(
        &mut self,
        fov: f32,
        aspect: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Result<(), CameraError> {
        self.fov = fov;
        self.aspect = aspect;
        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self.update_projection_matrix()
    }

    /// Change only the aspect ratio, e.g. after a resize
    pub fn set_aspect(&mut self, aspect: f32) -> Result<(), CameraError> {
        self.aspect = aspect;
        self.update_projection_matrix()
    }

    /// Rebuild the view matrix from `eye`, `center` and `up`.
    ///
    /// On a degenerate basis the previous view matrix is kept.
    pub fn update_view_matrix(&mut self) -> Result<(), CameraError> {
        let view = match look_at_matrix(&self.eye, &self.center, &self.up) {
            Some(view) => view,
            None => {
                log::warn!(
                    "Degenerate camera basis (eye={:?}, center={:?}, up={:?}), keeping previous view",
                    self.eye,
                    self.center,
                    self.up
                );
                return Err(CameraError::DegenerateView);
            }
        };

        self.view_matrix = view;
        self.viewprojection_matrix = self.projection_matrix * self.view_matrix;
        Ok(())
    }

    /// Rebuild the projection matrix from `fov`, `aspect`, `near_plane` and `far_plane`.
    ///
    /// On non-finite results the previous projection matrix is kept.
    pub fn update_projection_matrix(&mut self) -> Result<(), CameraError> {
        let projection =
            perspective_matrix(self.fov, self.aspect, self.near_plane, self.far_plane);

        if !projection.iter().all(|value| value.is_finite()) {
            log::warn!(
                "Invalid projection (fov={}, aspect={}, near={}, far={}), keeping previous projection",
                self.fov,
                self.aspect,
                self.near_plane,
                self.far_plane
            );
            return Err(CameraError::InvalidProjection {
                fov: self.fov,
                aspect: self.aspect,
                near: self.near_plane,
                far: self.far_plane,
            });
        }

        self.projection_matrix = projection;
        self.viewprojection_matrix = self.projection_matrix * self.view_matrix;
        Ok(())
    }

    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection_matrix
    }

    /// The cached composite, which may be stale if fields were mutated
    /// without an update call
    pub fn viewprojection_matrix(&self) -> &Matrix4<f32> {
        &self.viewprojection_matrix
    }

    /// Recompute the composite from the current view and projection matrices
    pub fn get_view_projection_matrix(&mut self) -> Matrix4<f32> {
        self.viewprojection_matrix = self.projection_matrix * self.view_matrix;
        self.viewprojection_matrix
    }

    /// Project a world-space point to normalized device coordinates.
    ///
    /// Returns `None` when the homogeneous `w` is (close to) zero, which
    /// happens for the eye itself and any point on the camera plane.
    pub fn project_vector(&self, point: &Point3<f32>) -> Option<Point3<f32>> {
        let clip = self.viewprojection_matrix * point.to_homogeneous();

        if !clip.w.is_finite() || clip.w.abs() < W_EPSILON {
            return None;
        }

        Some(Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Right-handed look-at: rows `side`, `top`, `-front`, applied after a
/// translation by `-eye`
fn look_at_matrix(
    eye: &Point3<f32>,
    center: &Point3<f32>,
    up: &Vector3<f32>,
) -> Option<Matrix4<f32>> {
    let front = (center - eye).try_normalize(BASIS_EPSILON)?;
    let side = front.cross(up).try_normalize(BASIS_EPSILON)?;
    let top = side.cross(&front);

    #[rustfmt::skip]
    let rotation = Matrix4::new(
        side.x,   side.y,   side.z,   0.0,
        top.x,    top.y,    top.z,    0.0,
        -front.x, -front.y, -front.z, 0.0,
        0.0,      0.0,      0.0,      1.0,
    );

    Some(rotation * Matrix4::new_translation(&(-eye.coords)))
}

/// Right-handed perspective mapping view-space depth into NDC z in [-1, 1]
fn perspective_matrix(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let f = 1.0 / (fov_degrees.to_radians() / 2.0).tan();

    let mut projection = Matrix4::zeros();
    projection[(0, 0)] = f / aspect;
    projection[(1, 1)] = f;
    projection[(2, 2)] = (far + near) / (near - far);
    projection[(2, 3)] = 2.0 * far * near / (near - far);
    projection[(3, 2)] = -1.0;
    projection
}
