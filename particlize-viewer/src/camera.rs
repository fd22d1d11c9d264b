//! Camera and orbit controls

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// A perspective camera orbiting the model
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 200.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            70.0_f32.to_radians(),
            16.0 / 9.0,
            1.0,
            3000.0,
        )
    }
}

/// Damped orbit/zoom controller.
///
/// Pointer input accumulates between frames; `update` is called once per
/// loop iteration, after the frame was rendered, so camera motion lands
/// on the next frame.
#[derive(Debug)]
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
    damping: f32,
}

impl OrbitController {
    /// Create a controller matching the camera's current pose
    pub fn new(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.norm().max(f32::EPSILON);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
            damping: 0.85,
        }
    }

    /// Accumulate a pointer drag (pixels)
    pub fn pointer_drag(&mut self, dx: f32, dy: f32) {
        self.pending_yaw += dx * 0.005;
        self.pending_pitch += dy * 0.005;
    }

    /// Accumulate a scroll step
    pub fn scroll(&mut self, delta: f32) {
        self.pending_zoom += delta;
    }

    /// Apply accumulated input to the camera; one call per frame
    pub fn update(&mut self, camera: &mut Camera) {
        self.yaw -= self.pending_yaw;
        self.pitch = (self.pitch + self.pending_pitch)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
        self.distance = (self.distance * (1.0 - self.pending_zoom * 0.1)).clamp(camera.near, camera.far);

        self.pending_yaw *= 1.0 - self.damping;
        self.pending_pitch *= 1.0 - self.damping;
        self.pending_zoom = 0.0;

        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let offset = Vector3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        );
        camera.position = camera.target + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_relative_eq!(camera.position.z, 200.0);
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn update_without_input_keeps_the_pose() {
        let mut camera = Camera::default();
        let mut controls = OrbitController::new(&camera);
        let before = camera.position;

        controls.update(&mut camera);

        assert_relative_eq!((camera.position - before).norm(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn drag_orbits_around_the_target() {
        let mut camera = Camera::default();
        let mut controls = OrbitController::new(&camera);
        let distance_before = (camera.position - camera.target).norm();

        controls.pointer_drag(120.0, 0.0);
        controls.update(&mut camera);

        let distance_after = (camera.position - camera.target).norm();
        assert_relative_eq!(distance_before, distance_after, epsilon = 1e-3);
        assert!(camera.position.x.abs() > 1.0);
    }

    #[test]
    fn scroll_zooms_toward_the_target() {
        let mut camera = Camera::default();
        let mut controls = OrbitController::new(&camera);

        controls.scroll(1.0);
        controls.update(&mut camera);

        assert!((camera.position - camera.target).norm() < 200.0);
    }
}
