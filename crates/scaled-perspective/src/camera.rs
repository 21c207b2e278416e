use glam::{DMat4, DVec3};

/// How the camera maps the scene onto the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Vertical field-of-view in radians
    Perspective { fov_y: f64 },
    /// Full vertical extent of the view, in scene length units
    Parallel { height: f64 },
}

/// The camera a `PerspectiveModel` reads and repositions.
///
/// The host application owns the real camera; implementing this trait is all
/// that's needed to drive it from the model.
pub trait Camera {
    fn eye(&self) -> DVec3;

    /// Unit length
    fn direction(&self) -> DVec3;

    fn up(&self) -> DVec3;

    fn projection(&self) -> Projection;

    fn set_projection(&mut self, projection: Projection);

    /// Moves the camera to `eye`, looking at `target`. Only the direction
    /// towards `target` matters, not its distance.
    fn set(&mut self, eye: DVec3, target: DVec3, up: DVec3);

    fn is_perspective(&self) -> bool {
        matches!(self.projection(), Projection::Perspective { .. })
    }

    fn right(&self) -> DVec3 {
        self.direction().cross(self.up()).normalize_or_zero()
    }

    /// Up vector made orthogonal to the view direction
    fn screen_up(&self) -> DVec3 {
        self.right().cross(self.direction())
    }

    /// Returns a right-handed look-at view matrix
    fn view_matrix(&self) -> DMat4 {
        let eye = self.eye();
        DMat4::look_at_rh(eye, eye + self.direction(), self.up())
    }

    /// Depth range [0, 1]
    fn projection_matrix(&self, aspect: f64, near: f64, far: f64) -> DMat4 {
        match self.projection() {
            Projection::Perspective { fov_y } => DMat4::perspective_rh(fov_y, aspect, near, far),
            Projection::Parallel { height } => {
                let half_h = height * 0.5;
                let half_w = half_h * aspect;
                DMat4::orthographic_rh(-half_w, half_w, -half_h, half_h, near, far)
            }
        }
    }
}

/// Plain in-memory camera, for hosts without one of their own and for tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCamera {
    eye: DVec3,
    direction: DVec3,
    up: DVec3,
    projection: Projection,
}

impl SceneCamera {
    /// None if `target` coincides with `eye` or `up` runs along the view direction.
    pub fn look_at(eye: DVec3, target: DVec3, up: DVec3, projection: Projection) -> Option<Self> {
        let direction = (target - eye).try_normalize()?;
        let up = up.try_normalize()?;
        if direction.cross(up).length_squared() < 1e-12 {
            return None;
        }

        Some(Self {
            eye,
            direction,
            up,
            projection,
        })
    }

    pub fn perspective(eye: DVec3, target: DVec3, up: DVec3, fov_y: f64) -> Option<Self> {
        Self::look_at(eye, target, up, Projection::Perspective { fov_y })
    }

    pub fn parallel(eye: DVec3, target: DVec3, up: DVec3, height: f64) -> Option<Self> {
        Self::look_at(eye, target, up, Projection::Parallel { height })
    }
}

impl Camera for SceneCamera {
    fn eye(&self) -> DVec3 {
        self.eye
    }

    fn direction(&self) -> DVec3 {
        self.direction
    }

    fn up(&self) -> DVec3 {
        self.up
    }

    fn projection(&self) -> Projection {
        self.projection
    }

    fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    fn set(&mut self, eye: DVec3, target: DVec3, up: DVec3) {
        match (target - eye).try_normalize() {
            Some(direction) => self.direction = direction,
            None => tracing::warn!("camera target coincides with eye, keeping direction"),
        }
        if let Some(up) = up.try_normalize() {
            self.up = up;
        }
        self.eye = eye;
    }
}
