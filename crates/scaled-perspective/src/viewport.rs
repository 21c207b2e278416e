use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::{
    camera::{Camera, Projection},
    geometry::Ray,
};

// only x/y survive the projection, so these just need to bracket the scene
const PROJECT_NEAR: f64 = 1e-3;
const PROJECT_FAR: f64 = 1e9;

/// Viewport corners. 0→1 runs along the width, 0→2 down the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

/// Size of the drawing area in logical pixels, origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }

    pub fn corner(&self, corner: Corner) -> DVec2 {
        let DVec2 { x: w, y: h } = self.size();
        match corner {
            Corner::TopLeft => DVec2::new(0.0, 0.0),
            Corner::TopRight => DVec2::new(w, 0.0),
            Corner::BottomLeft => DVec2::new(0.0, h),
            Corner::BottomRight => DVec2::new(w, h),
        }
    }

    /// Screen Y is top-down, NDC Y is bottom-up
    pub fn ndc(&self, x: f64, y: f64) -> DVec2 {
        let DVec2 { x: w, y: h } = self.size().max(DVec2::ONE);
        DVec2::new((2.0 * x / w) - 1.0, 1.0 - (2.0 * y / h))
    }

    /// Ray from the camera through a logical pixel.
    ///
    /// Perspective rays start at the eye and fan out, parallel rays start on
    /// the view plane and all share the view direction.
    pub fn pick_ray(&self, camera: &impl Camera, x: f64, y: f64) -> Ray {
        let ndc = self.ndc(x, y);
        let forward = camera.direction();
        let right = camera.right();
        let up = camera.screen_up();

        match camera.projection() {
            Projection::Perspective { fov_y } => {
                let half_h = (fov_y * 0.5).tan();
                let half_w = half_h * self.aspect();
                let direction = forward + right * (ndc.x * half_w) + up * (ndc.y * half_h);
                Ray::new(camera.eye(), direction)
            }
            Projection::Parallel { height } => {
                let half_h = height * 0.5;
                let half_w = half_h * self.aspect();
                let origin = camera.eye() + right * (ndc.x * half_w) + up * (ndc.y * half_h);
                Ray::new(origin, forward)
            }
        }
    }

    pub fn corner_ray(&self, camera: &impl Camera, corner: Corner) -> Ray {
        let DVec2 { x, y } = self.corner(corner);
        self.pick_ray(camera, x, y)
    }

    /// Logical pixel a scene point lands on, None if it's behind a perspective eye.
    pub fn project(&self, camera: &impl Camera, point: DVec3) -> Option<DVec2> {
        let view_projection =
            camera.projection_matrix(self.aspect(), PROJECT_NEAR, PROJECT_FAR) * camera.view_matrix();
        let clip = view_projection * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.truncate().truncate() / clip.w;
        let size = self.size();
        Some(DVec2::new(
            (ndc.x + 1.0) * 0.5 * size.x,
            (1.0 - ndc.y) * 0.5 * size.y,
        ))
    }
}
