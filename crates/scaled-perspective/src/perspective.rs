use glam::DVec3;

use crate::{
    camera::{Camera, Projection},
    error::{Result, ScaledPerspectiveError},
    geometry::Plane,
    scale::Scale,
};

/// Below this the target plane is considered to pass through the eye.
const MIN_TARGET_DISTANCE: f64 = 1e-9;

/// Scale that applies at a chosen position in view.
///
/// The target plane runs through `target`, perpendicular to the camera's view
/// direction. Two physical quantities hang off it:
///
/// * `image_height`: how tall the exported image must be printed for the
///   target plane to appear at `scale`.
/// * `viewing_distance`: how far from that print the viewer must stand for
///   the perspective to read correctly.
///
/// Only the explicit setters for those two touch the camera; changing the
/// scale or target never does. Each setter validates everything before the
/// first camera write, so the camera is never left half updated.
#[derive(Debug, Clone)]
pub struct PerspectiveModel<C: Camera> {
    camera: C,
    scale: Scale,
    // cached from `scale`, which is only ever replaced by a valid one
    factor: f64,
    target: Option<DVec3>,
}

impl<C: Camera> PerspectiveModel<C> {
    pub fn new(camera: C, scale: Scale) -> Result<Self> {
        let factor = valid_factor(&scale)?;
        Ok(Self {
            camera,
            scale,
            factor,
            target: None,
        })
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Replaces the scale. The camera is left alone, derived values simply
    /// pick up the new factor on the next read.
    pub fn set_scale(&mut self, scale: Scale) -> Result<()> {
        self.factor = valid_factor(&scale)?;
        self.scale = scale;
        Ok(())
    }

    pub fn target(&self) -> Option<DVec3> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<DVec3>) {
        tracing::debug!("scale target: {target:?}");
        self.target = target;
    }

    pub fn can_set_viewing_distance(&self) -> bool {
        self.camera.is_perspective() && self.target.is_some()
    }

    pub fn can_set_image_height(&self) -> bool {
        !self.camera.is_perspective() || self.target.is_some()
    }

    pub fn target_plane(&self) -> Option<Plane> {
        Plane::new(self.target?, self.camera.direction())
    }

    /// Distance the image needs to be viewed at for the perspective to be correct.
    ///
    /// None unless the camera is in perspective and a target is set.
    pub fn viewing_distance(&self) -> Option<f64> {
        if !self.can_set_viewing_distance() {
            return None;
        }
        Some(self.target_distance()? * self.factor)
    }

    /// Moves the camera and adjusts its field of view so the perspective is
    /// correct at `viewing_distance`, keeping the image height.
    pub fn set_viewing_distance(&mut self, viewing_distance: f64) -> Result<()> {
        positive(viewing_distance)?;
        if !self.can_set_viewing_distance() {
            return Err(ScaledPerspectiveError::ViewingDistanceUnavailable);
        }
        let plane = self
            .target_plane()
            .ok_or(ScaledPerspectiveError::ViewingDistanceUnavailable)?;
        let current = plane.distance_to(self.camera.eye()) * self.factor;
        if current < MIN_TARGET_DISTANCE {
            return Err(ScaledPerspectiveError::DegenerateGeometry(
                "target plane passes through the camera eye",
            ));
        }

        self.multiply_plane_extents(current / viewing_distance);
        self.set_target_distance(&plane, viewing_distance / self.factor);

        tracing::debug!("viewing distance {current} -> {viewing_distance}");
        Ok(())
    }

    /// Height the exported image must have for the scale to apply.
    ///
    /// Parallel projection doesn't need a target for this; perspective does.
    pub fn image_height(&self) -> Option<f64> {
        if !self.can_set_image_height() {
            return None;
        }
        Some(self.target_plane_height()? * self.factor)
    }

    /// Adjusts the field of view (or parallel view height) for a new image
    /// height, keeping scale and viewing distance.
    pub fn set_image_height(&mut self, image_height: f64) -> Result<()> {
        positive(image_height)?;
        let current = self
            .image_height()
            .ok_or(ScaledPerspectiveError::ImageHeightUnavailable)?;
        if current < MIN_TARGET_DISTANCE {
            return Err(ScaledPerspectiveError::DegenerateGeometry(
                "target plane has no extent",
            ));
        }

        self.multiply_plane_extents(image_height / current);

        tracing::debug!("image height {current} -> {image_height}");
        Ok(())
    }

    fn multiply_plane_extents(&mut self, factor: f64) {
        let projection = match self.camera.projection() {
            Projection::Perspective { fov_y } => Projection::Perspective {
                fov_y: ((fov_y * 0.5).tan() * factor).atan() * 2.0,
            },
            Projection::Parallel { height } => Projection::Parallel {
                height: height * factor,
            },
        };
        self.camera.set_projection(projection);
    }

    /// Vertical extent of the target plane covered by the view.
    fn target_plane_height(&self) -> Option<f64> {
        match self.camera.projection() {
            Projection::Perspective { fov_y } => {
                Some(self.target_distance()? * (fov_y * 0.5).tan() * 2.0)
            }
            Projection::Parallel { height } => Some(height),
        }
    }

    fn target_distance(&self) -> Option<f64> {
        Some(self.target_plane()?.distance_to(self.camera.eye()))
    }

    /// Slides the eye along the view direction, keeping direction and up.
    fn set_target_distance(&mut self, plane: &Plane, target_distance: f64) {
        let direction = self.camera.direction();
        let up = self.camera.up();
        let eye = plane.project(self.camera.eye()) - direction * target_distance;

        self.camera.set(eye, eye + direction, up);
    }
}

fn valid_factor(scale: &Scale) -> Result<f64> {
    scale
        .factor()
        .ok_or_else(|| ScaledPerspectiveError::InvalidScale(scale.to_string()))
}

fn positive(value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScaledPerspectiveError::NonPositiveLength(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{camera::SceneCamera, error::ErrorKind};

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = TOLERANCE * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() < tolerance,
            "{actual} != {expected}"
        );
    }

    fn perspective_camera(fov_degrees: f64) -> SceneCamera {
        SceneCamera::perspective(
            DVec3::new(0.0, -5000.0, 1600.0),
            DVec3::new(0.0, 0.0, 1600.0),
            DVec3::Z,
            fov_degrees.to_radians(),
        )
        .unwrap()
    }

    fn parallel_camera(height: f64) -> SceneCamera {
        SceneCamera::parallel(
            DVec3::new(0.0, -5000.0, 1600.0),
            DVec3::new(0.0, 0.0, 1600.0),
            DVec3::Z,
            height,
        )
        .unwrap()
    }

    fn targeted_model(scale: &str) -> PerspectiveModel<SceneCamera> {
        let mut model = PerspectiveModel::new(perspective_camera(60.0), Scale::parse(scale)).unwrap();
        // off-axis, the plane is still 5000 in front of the eye
        model.set_target(Some(DVec3::new(700.0, 0.0, 300.0)));
        model
    }

    #[test]
    fn rejects_invalid_scale() {
        let err = PerspectiveModel::new(perspective_camera(60.0), Scale::parse("1:0")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let mut model = targeted_model("1:100");
        assert!(model.set_scale(Scale::parse("zero")).is_err());
        assert_eq!(model.scale(), Scale::parse("1:100"));
    }

    #[test]
    fn scenario_a_perspective_with_target() {
        let model = targeted_model("1:100");

        let expected = 2.0 * 5000.0 * 30f64.to_radians().tan() * 0.01;
        assert_close(model.image_height().unwrap(), expected);
        assert_close(model.viewing_distance().unwrap(), 50.0);
    }

    #[test]
    fn scenario_b_parallel_without_target() {
        let model = PerspectiveModel::new(parallel_camera(2000.0), Scale::parse("1:50")).unwrap();

        assert!(model.can_set_image_height());
        assert!(!model.can_set_viewing_distance());
        assert_close(model.image_height().unwrap(), 40.0);
        assert_eq!(model.viewing_distance(), None);
    }

    #[test]
    fn scenario_c_perspective_without_target() {
        let mut model =
            PerspectiveModel::new(perspective_camera(60.0), Scale::parse("1:100")).unwrap();

        assert_eq!(model.viewing_distance(), None);
        assert_eq!(model.image_height(), None);

        let before = model.camera().clone();
        let err = model.set_viewing_distance(500.0).unwrap_err();
        assert_eq!(err, ScaledPerspectiveError::ViewingDistanceUnavailable);
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let err = model.set_image_height(100.0).unwrap_err();
        assert_eq!(err, ScaledPerspectiveError::ImageHeightUnavailable);
        assert_eq!(model.camera(), &before);
    }

    #[test]
    fn capability_predicates_follow_mode_and_target() {
        for perspective in [true, false] {
            for target in [None, Some(DVec3::new(0.0, 0.0, 1600.0))] {
                let camera = if perspective {
                    perspective_camera(45.0)
                } else {
                    parallel_camera(1000.0)
                };
                let mut model = PerspectiveModel::new(camera, Scale::default()).unwrap();
                model.set_target(target);

                assert_eq!(
                    model.can_set_viewing_distance(),
                    perspective && target.is_some()
                );
                assert_eq!(model.can_set_image_height(), !perspective || target.is_some());
                assert_eq!(
                    model.viewing_distance().is_some(),
                    model.can_set_viewing_distance()
                );
                assert_eq!(model.image_height().is_some(), model.can_set_image_height());
            }
        }
    }

    #[test]
    fn viewing_distance_round_trip_keeps_image_height() {
        for scale in ["1:100", "1:20", "3:7"] {
            for viewing_distance in [12.5, 350.0, 4000.0] {
                let mut model = targeted_model(scale);
                let image_height = model.image_height().unwrap();
                let direction = model.camera().direction();
                let up = model.camera().up();

                model.set_viewing_distance(viewing_distance).unwrap();

                assert_close(model.viewing_distance().unwrap(), viewing_distance);
                assert_close(model.image_height().unwrap(), image_height);
                assert!(model.camera().direction().abs_diff_eq(direction, 1e-12));
                assert_eq!(model.camera().up(), up);
            }
        }
    }

    #[test]
    fn viewing_distance_moves_eye_along_view_direction() {
        let mut model = targeted_model("1:100");
        model.set_viewing_distance(25.0).unwrap();

        // 25 / 0.01 = 2500 in front of the plane at y = 0
        assert!(model
            .camera()
            .eye()
            .abs_diff_eq(DVec3::new(0.0, -2500.0, 1600.0), 1e-6));
    }

    #[test]
    fn image_height_round_trip_keeps_viewing_distance() {
        for image_height in [10.0, 57.7, 300.0] {
            let mut model = targeted_model("1:50");
            let viewing_distance = model.viewing_distance().unwrap();
            let eye = model.camera().eye();

            model.set_image_height(image_height).unwrap();

            assert_close(model.image_height().unwrap(), image_height);
            assert_close(model.viewing_distance().unwrap(), viewing_distance);
            assert_eq!(model.camera().eye(), eye);
        }
    }

    #[test]
    fn image_height_in_parallel_scales_view_height() {
        let mut model = PerspectiveModel::new(parallel_camera(2000.0), Scale::parse("1:50")).unwrap();
        model.set_image_height(60.0).unwrap();

        assert_close(model.image_height().unwrap(), 60.0);
        assert_eq!(
            model.camera().projection(),
            Projection::Parallel { height: 3000.0 }
        );
    }

    #[test]
    fn scale_change_leaves_camera_alone() {
        let mut model = targeted_model("1:100");
        let before = model.camera().clone();
        let image_height = model.image_height().unwrap();

        model.set_scale(Scale::parse("1:50")).unwrap();
        assert_eq!(model.camera(), &before);
        assert_close(model.image_height().unwrap(), image_height * 2.0);

        let first = (model.viewing_distance(), model.image_height());
        model.set_scale(Scale::parse("1:50")).unwrap();
        model.set_scale(Scale::parse("1:50")).unwrap();
        assert_eq!((model.viewing_distance(), model.image_height()), first);
    }

    #[test]
    fn rejects_non_positive_lengths() {
        let mut model = targeted_model("1:100");
        let before = model.camera().clone();

        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = model.set_viewing_distance(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            let err = model.set_image_height(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert_eq!(model.camera(), &before);
    }

    #[test]
    fn target_in_eye_plane_is_degenerate() {
        let mut model = targeted_model("1:100");
        let eye = model.camera().eye();
        model.set_target(Some(eye + DVec3::X * 100.0));

        assert_eq!(model.viewing_distance(), Some(0.0));
        let err = model.set_viewing_distance(10.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Degenerate);
        let err = model.set_image_height(10.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Degenerate);
    }
}
