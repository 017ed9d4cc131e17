//! Perspective camera with damped orbit controls

use butterfly_core::{mat4_mul, Vec3};

/// A perspective camera looking at a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 2.0),
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Get the view matrix (4x4, column-major)
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);

        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Get the projection matrix (4x4, column-major), depth mapped to [0, 1]
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let range = self.far / (self.near - self.far);

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, range, -1.0],
            [0.0, 0.0, range * self.near, 0.0],
        ]
    }

    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        mat4_mul(&self.projection_matrix(), &self.view_matrix())
    }
}

/// Drag-to-orbit, scroll-to-zoom controls with inertial damping.
///
/// Input accumulates into pending deltas; each [`OrbitControls::update`]
/// applies a `damping_factor` share of them and decays the rest, so motion
/// eases out over the following frames.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    distance: f32,
    /// Horizontal angle in radians
    yaw: f32,
    /// Vertical angle in radians
    pitch: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    enabled: bool,
}

const MAX_PITCH: f32 = 1.56;
const ZOOM_BASE: f32 = 0.95;
const SETTLED: f32 = 1e-6;

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            damping_factor: 0.05,
            rotate_speed: 0.5,
            zoom_speed: 1.0,
            min_distance: 1.5,
            max_distance: 4.0,
            distance: 2.0,
            yaw: 0.0,
            pitch: 0.0,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            enabled: true,
        }
    }
}

impl OrbitControls {
    /// Controls orbiting the camera's current position around its target
    pub fn attach(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target: camera.target,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            ..Self::default()
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queue a rotation from a pointer drag of (`dx`, `dy`) pixels in a
    /// viewport `viewport_height` pixels tall
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        let scale = std::f32::consts::TAU * self.rotate_speed / viewport_height;
        self.yaw_delta -= dx * scale;
        self.pitch_delta += dy * scale;
    }

    /// Dolly by `steps` wheel notches; positive moves closer
    pub fn zoom(&mut self, steps: f32) {
        if !self.enabled {
            return;
        }
        let scale = ZOOM_BASE.powf(self.zoom_speed * steps);
        self.distance = (self.distance * scale).clamp(self.min_distance, self.max_distance);
    }

    /// Apply one frame of damped motion and place the camera.
    ///
    /// Returns whether the camera is still moving.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if self.enabled {
            self.yaw += self.yaw_delta * self.damping_factor;
            self.pitch =
                (self.pitch + self.pitch_delta * self.damping_factor).clamp(-MAX_PITCH, MAX_PITCH);
            self.yaw_delta *= 1.0 - self.damping_factor;
            self.pitch_delta *= 1.0 - self.damping_factor;
        }
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        camera.position = Vec3::new(self.target.x + x, self.target.y + y, self.target.z + z);
        camera.target = self.target;

        self.yaw_delta.abs() > SETTLED || self.pitch_delta.abs() > SETTLED
    }

    /// Detach from input; pending motion is dropped
    pub fn dispose(&mut self) {
        self.enabled = false;
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_matches_globe_view() {
        let camera = Camera::default();
        assert_eq!(camera.fov, 75.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::new(1.5);
        let m = camera.view_projection_matrix();
        // Column-major: the origin maps to the last column
        let clip = m[3];
        assert!((clip[0] / clip[3]).abs() < 1e-6);
        assert!((clip[1] / clip[3]).abs() < 1e-6);
        let depth = clip[2] / clip[3];
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn set_viewport_updates_aspect() {
        let mut camera = Camera::default();
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn attach_preserves_camera_position() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::attach(&camera);
        assert!((controls.distance() - 2.0).abs() < 1e-6);
        controls.update(&mut camera);
        assert!((camera.position - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn drag_eases_out_over_frames() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::attach(&camera);
        controls.rotate(-100.0, 0.0, 720.0);

        controls.update(&mut camera);
        let first = controls.yaw();
        controls.update(&mut camera);
        let second = controls.yaw() - first;
        assert!(first > 0.0);
        assert!(second > 0.0 && second < first);

        for _ in 0..1000 {
            controls.update(&mut camera);
        }
        assert!(!controls.update(&mut camera));
        // The full drag is eventually applied: 100px * TAU * 0.5 / 720
        let expected = 100.0 * std::f32::consts::TAU * 0.5 / 720.0;
        assert!((controls.yaw() - expected).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::attach(&camera);
        controls.zoom(100.0);
        assert_eq!(controls.distance(), 1.5);
        controls.zoom(-100.0);
        assert_eq!(controls.distance(), 4.0);
        controls.update(&mut camera);
        assert!((camera.position.length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::attach(&camera);
        controls.rotate(0.0, 100_000.0, 720.0);
        for _ in 0..500 {
            controls.update(&mut camera);
        }
        assert!(controls.pitch() <= MAX_PITCH);
    }

    #[test]
    fn dispose_ignores_further_input() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::attach(&camera);
        controls.rotate(50.0, 50.0, 720.0);
        controls.dispose();
        controls.rotate(50.0, 50.0, 720.0);
        controls.zoom(3.0);

        assert!(!controls.is_enabled());
        assert!(!controls.update(&mut camera));
        assert_eq!(controls.yaw(), 0.0);
        assert_eq!(controls.distance(), 2.0);
    }
}
