use glam::{Mat4, Vec3, Vec4};

/// A left-handed perspective or orthographic camera.
///
/// The world transform and its inverse (the view matrix) are kept in sync;
/// the projection is rebuilt whenever the lens parameters change. The path
/// tracer only consumes the pose, field of view and aspect ratio, but the
/// matrices are exposed for rasterizing hosts that want to share the camera.
pub struct Camera {
    transform: Mat4,
    view: Mat4,
    projection: Mat4,

    ortho: bool,
    aspect: f32,
    fov_y: f32,
    near: f32,
    far: f32,
    ortho_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            transform: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            ortho: false,
            aspect: 1.0,
            fov_y: 45.0,
            near: 0.1,
            far: 100.0,
            ortho_height: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Camera::default()
    }

    /// Aim the camera at `target`, with `+y` as the up reference.
    pub fn look_at(&mut self, target: Vec3) {
        self.look_at_with_up(target, Vec3::Y);
    }

    pub fn look_at_with_up(&mut self, target: Vec3, up: Vec3) {
        self.view = Mat4::look_at_lh(self.position(), target, up);
        self.transform = self.view.inverse();
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.transform.w_axis = Vec4::new(x, y, z, 1.0);
        self.view = self.transform.inverse();
    }

    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    pub fn set_clip(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    /// Switch to a perspective lens. `fov_y` is the vertical field of view
    /// in degrees.
    pub fn set_fov_y_and_aspect(&mut self, fov_y: f32, aspect: f32) {
        self.ortho = false;
        self.fov_y = fov_y;
        self.aspect = aspect;
        self.projection =
            Mat4::perspective_lh(self.fov_y.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        let aspect = self.aspect;
        self.set_fov_y_and_aspect(fov_y, aspect);
    }

    /// Switch to an orthographic lens covering `width` x `height` world
    /// units, centered on the view axis.
    pub fn set_ortho_size(&mut self, width: f32, height: f32) {
        self.ortho = true;
        self.aspect = width / height;
        self.ortho_height = height;
        self.projection = Mat4::orthographic_lh(
            width * -0.5,
            width * 0.5,
            height * -0.5,
            height * 0.5,
            self.near,
            self.far,
        );
    }

    /// The camera's right, up and front axes in world space.
    pub fn basis_vectors(&self) -> (Vec3, Vec3, Vec3) {
        (
            self.transform.x_axis.truncate(),
            self.transform.y_axis.truncate(),
            self.transform.z_axis.truncate(),
        )
    }

    pub fn is_ortho(&self) -> bool {
        self.ortho
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn ortho_height(&self) -> f32 {
        self.ortho_height
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.transform
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_faces_positive_z() {
        let camera = Camera::new();
        let (right, up, front) = camera.basis_vectors();
        assert_eq!(right, Vec3::X);
        assert_eq!(up, Vec3::Y);
        assert_eq!(front, Vec3::Z);
        assert_eq!(camera.position(), Vec3::ZERO);
    }

    #[test]
    fn look_at_points_front_at_target() {
        let mut camera = Camera::new();
        camera.set_position(0.0, 0.0, -5.0);
        camera.look_at(Vec3::new(0.0, 0.0, 2.0));

        let (right, up, front) = camera.basis_vectors();
        assert!((front - Vec3::Z).length() < 1e-5);
        assert!((up - Vec3::Y).length() < 1e-5);
        assert!((right - Vec3::X).length() < 1e-5);
        // The pose survives the round trip through the view matrix.
        assert!((camera.position() - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn look_at_off_axis_basis_is_orthonormal() {
        let mut camera = Camera::new();
        camera.set_position(3.0, 4.0, -5.0);
        camera.look_at(Vec3::new(-1.0, 0.5, 2.0));

        let (right, up, front) = camera.basis_vectors();
        let to_target = (Vec3::new(-1.0, 0.5, 2.0) - camera.position()).normalize();
        assert!((front - to_target).length() < 1e-4);
        assert!(right.dot(up).abs() < 1e-5);
        assert!(right.dot(front).abs() < 1e-5);
        assert!(up.dot(front).abs() < 1e-5);
    }

    #[test]
    fn view_inverts_world() {
        let mut camera = Camera::new();
        camera.set_position(1.0, 2.0, 3.0);
        camera.look_at(Vec3::ZERO);

        let product = *camera.world_matrix() * *camera.view_matrix();
        let diff: f32 = (0..4)
            .map(|i| (product.col(i) - Mat4::IDENTITY.col(i)).length())
            .sum();
        assert!(diff < 1e-4);
    }
}
