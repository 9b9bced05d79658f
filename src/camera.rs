//! Orbit camera for the graph scene
//!
//! Spherical-coordinate controls (orbit, zoom, pan) around a target point,
//! view/projection matrices for the renderer, and the two conversions the
//! scene needs without a GPU: world point to screen pixel (label anchors)
//! and screen pixel to world ray (picking).

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Default vertical field of view (60 degrees)
pub const DEFAULT_FOV: f32 = PI / 3.0;

/// Default near clip plane
pub const DEFAULT_NEAR: f32 = 0.1;

/// Default far clip plane
pub const DEFAULT_FAR: f32 = 1000.0;

/// Camera position of the initial view
pub const DEFAULT_EYE: [f32; 3] = [50.0, 50.0, 50.0];

/// Minimum camera distance (zoom limit)
pub const MIN_DISTANCE: f32 = 10.0;

/// Maximum camera distance (zoom limit)
pub const MAX_DISTANCE: f32 = 200.0;

const ELEVATION_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Half-line used for picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Distance along the ray to the first hit with a sphere, if any
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let offset = self.origin - center;
        let b = offset.dot(self.direction);
        let c = offset.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // origin inside the sphere
            Some(0.0)
        } else {
            None
        }
    }
}

/// Camera orbiting a target point.
///
/// - `distance`: how far from the target
/// - `azimuth`: angle around the Y axis (0 = on +Z)
/// - `elevation`: angle above the XZ plane
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    pub distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    /// Camera at the default view with the given aspect ratio
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            distance: 0.0,
            azimuth: 0.0,
            elevation: 0.0,
            target: Vec3::ZERO,
            fov: DEFAULT_FOV,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        };
        camera.reset();
        camera
    }

    /// World-space eye position
    pub fn position(&self) -> Vec3 {
        let (sin_elev, cos_elev) = self.elevation.sin_cos();
        let (sin_azim, cos_azim) = self.azimuth.sin_cos();
        self.target
            + self.distance * Vec3::new(cos_elev * sin_azim, sin_elev, cos_elev * cos_azim)
    }

    /// World to view space
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// View to clip space (depth 0..1)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// World to clip space
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Orbit around the target (radians; positive elevation moves up)
    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth = wrap_angle(self.azimuth + delta_azimuth);
        self.elevation =
            (self.elevation + delta_elevation).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Exponential zoom: positive `delta` moves closer
    pub fn zoom(&mut self, delta: f32) {
        let factor = 1.0 - delta * 0.1;
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Move the target in screen space, scaled by distance
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let (right, up) = self.screen_vectors();
        let scale = self.distance * 0.001;
        self.target += (right * delta_x + up * delta_y) * scale;
    }

    /// Back to the initial view
    pub fn reset(&mut self) {
        let eye = Vec3::from_array(DEFAULT_EYE);
        self.target = Vec3::ZERO;
        self.distance = eye.length();
        self.azimuth = eye.x.atan2(eye.z);
        self.elevation = (eye.y / self.distance).asin();
    }

    /// Look at `point` without changing distance or angles
    pub fn focus(&mut self, point: [f32; 3]) {
        self.target = Vec3::from_array(point);
    }

    /// Update the aspect ratio after a resize
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Pixel coordinates (origin top-left) of a world point, or `None` when
    /// it is behind the camera
    pub fn project(&self, world: [f32; 3], width: f32, height: f32) -> Option<Vec2> {
        let clip = self.view_projection() * Vec3::from_array(world).extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        ))
    }

    /// Ray from the eye through pixel (`x`, `y`)
    pub fn ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        let ndc_x = 2.0 * x / width.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height.max(1.0);
        let inverse = self.view_projection().inverse();
        let near = unproject(inverse, Vec4::new(ndc_x, ndc_y, 0.0, 1.0));
        let far = unproject(inverse, Vec4::new(ndc_x, ndc_y, 1.0, 1.0));
        Ray {
            origin: near,
            direction: (far - near).normalize_or(Vec3::NEG_Z),
        }
    }

    fn screen_vectors(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}

fn unproject(inverse: Mat4, clip: Vec4) -> Vec3 {
    let world = inverse * clip;
    world.truncate() / world.w
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-2
    }

    #[test]
    fn test_default_view() {
        let camera = Camera3D::new(800.0 / 600.0);
        assert!(close(camera.position(), Vec3::splat(50.0)));
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.fov.to_degrees() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_position_on_z_axis() {
        let mut camera = Camera3D::new(1.0);
        camera.azimuth = 0.0;
        camera.elevation = 0.0;
        camera.distance = 100.0;
        assert!(close(camera.position(), Vec3::new(0.0, 0.0, 100.0)));
    }

    #[test]
    fn test_orbit_clamps_elevation_and_wraps_azimuth() {
        let mut camera = Camera3D::new(1.0);
        camera.orbit(0.0, 10.0);
        assert!(camera.elevation < FRAC_PI_2 && camera.elevation > 0.0);
        camera.orbit(0.0, -20.0);
        assert!(camera.elevation > -FRAC_PI_2 && camera.elevation < 0.0);

        camera.orbit(7.0, 0.0);
        assert!((-PI..=PI).contains(&camera.azimuth));
        camera.orbit(-14.0, 0.0);
        assert!((-PI..=PI).contains(&camera.azimuth));
    }

    #[test]
    fn test_zoom_limits() {
        let mut camera = Camera3D::new(1.0);
        let start = camera.distance;
        camera.zoom(1.0);
        assert!(camera.distance < start);

        for _ in 0..100 {
            camera.zoom(1.0);
        }
        assert_eq!(camera.distance, MIN_DISTANCE);
        for _ in 0..100 {
            camera.zoom(-1.0);
        }
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_pan_moves_target_and_reset_restores() {
        let mut camera = Camera3D::new(1.0);
        let initial = camera.clone();
        camera.pan(100.0, 50.0);
        assert_ne!(camera.target, Vec3::ZERO);

        camera.orbit(1.0, 0.2);
        camera.zoom(2.0);
        camera.reset();
        assert!(close(camera.position(), initial.position()));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_focus() {
        let mut camera = Camera3D::new(1.0);
        camera.focus([10.0, 20.0, 30.0]);
        assert_eq!(camera.target, Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_target_projects_to_viewport_center() {
        let camera = Camera3D::new(800.0 / 600.0);
        let screen = camera.project([0.0, 0.0, 0.0], 800.0, 600.0).unwrap();
        assert!((screen.x - 400.0).abs() < 0.5);
        assert!((screen.y - 300.0).abs() < 0.5);
    }

    #[test]
    fn test_point_behind_camera_is_not_projected() {
        let camera = Camera3D::new(1.0);
        assert!(camera.project([200.0, 200.0, 200.0], 100.0, 100.0).is_none());
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = Camera3D::new(800.0 / 600.0);
        let ray = camera.ray(400.0, 300.0, 800.0, 600.0);
        let hit = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((hit - (camera.position().length() - camera.near - 1.0)).abs() < 0.5);
    }

    #[test]
    fn test_ray_through_projected_point_hits_it() {
        let camera = Camera3D::new(800.0 / 600.0);
        let point = [12.0, -5.0, 3.0];
        let screen = camera.project(point, 800.0, 600.0).unwrap();
        let ray = camera.ray(screen.x, screen.y, 800.0, 600.0);
        assert!(ray.intersect_sphere(Vec3::from_array(point), 0.1).is_some());
    }

    #[test]
    fn test_ray_misses_offscreen_sphere() {
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
        };
        assert_eq!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0), Some(4.0));
        assert_eq!(ray.intersect_sphere(Vec3::new(-5.0, 0.0, 0.0), 1.0), None);
        assert_eq!(ray.intersect_sphere(Vec3::new(5.0, 3.0, 0.0), 1.0), None);
        assert_eq!(ray.intersect_sphere(Vec3::ZERO, 1.0), Some(0.0));
    }
}
