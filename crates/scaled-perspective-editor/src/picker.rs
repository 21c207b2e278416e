use glam::DVec3;
use scaled_perspective::{
    bounds::Aabb,
    geometry::{PickScene, Plane},
    Camera, PerspectiveModel, Viewport,
};
use strum::Display;

use crate::{
    companion::{CompanionUi, DerivedValues},
    config::EditorConfig,
    grid::PlaneGrid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PickerState {
    Idle,
    Hovering,
    Confirmed,
}

/// Interactive tool for choosing the point the scale applies at.
///
/// Lives from tool activation to deactivation. The confirmed point is what
/// was last written to the model's target, so the two are always cleared
/// together. In parallel projection there is nothing to pick: the companion
/// panel is shown straight away and the pointer handlers do nothing.
#[derive(Debug, Clone)]
pub struct PlanePicker {
    hover: Option<DVec3>,
    confirmed: Option<DVec3>,
    suspended: bool,
    config: EditorConfig,
}

impl PlanePicker {
    pub fn activate<C: Camera>(
        model: &PerspectiveModel<C>,
        ui: &mut impl CompanionUi,
        config: EditorConfig,
    ) -> Self {
        if model.camera().is_perspective() {
            tracing::info!("{}", config.status_text);
        } else {
            tracing::info!("parallel projection, skipping plane pick");
            ui.show();
        }

        Self {
            hover: None,
            confirmed: None,
            suspended: false,
            config,
        }
    }

    pub fn state(&self) -> PickerState {
        match (self.hover, self.confirmed) {
            (_, Some(_)) => PickerState::Confirmed,
            (Some(_), None) => PickerState::Hovering,
            (None, None) => PickerState::Idle,
        }
    }

    pub fn hover(&self) -> Option<DVec3> {
        self.hover
    }

    pub fn confirmed(&self) -> Option<DVec3> {
        self.confirmed
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Casts the pointer ray into `scene`. A miss clears the hover point.
    pub fn on_pointer_move<C: Camera, S: PickScene + ?Sized>(
        &mut self,
        model: &PerspectiveModel<C>,
        viewport: &Viewport,
        scene: &S,
        x: f64,
        y: f64,
    ) -> Option<DVec3> {
        if !model.camera().is_perspective() {
            return None;
        }

        let ray = viewport.pick_ray(model.camera(), x, y);
        self.hover = scene.pick(&ray);
        tracing::trace!("hover at ({x}, {y}): {:?}", self.hover);
        self.hover
    }

    /// Confirms the hover point as the target. Returns false when there is
    /// nothing under the pointer.
    pub fn on_click<C: Camera>(
        &mut self,
        model: &mut PerspectiveModel<C>,
        ui: &mut impl CompanionUi,
    ) -> bool {
        if !model.camera().is_perspective() {
            return false;
        }

        let Some(point) = self.hover else {
            tracing::debug!("click without a hover point");
            return false;
        };

        self.confirmed = Some(point);
        model.set_target(Some(point));
        ui.show();
        true
    }

    pub fn on_cancel<C: Camera>(&mut self, model: &mut PerspectiveModel<C>) {
        if !model.camera().is_perspective() {
            return;
        }

        self.confirmed = None;
        model.set_target(None);
    }

    /// Another tool took over temporarily, e.g. orbit.
    pub fn on_suspend<C: Camera>(&mut self, model: &PerspectiveModel<C>) {
        if model.camera().is_perspective() {
            self.suspended = true;
        }
    }

    /// Returns the status text to show again.
    pub fn on_resume<C: Camera>(&mut self, model: &PerspectiveModel<C>) -> Option<&str> {
        if !model.camera().is_perspective() {
            return None;
        }
        self.suspended = false;
        self.status_text(model)
    }

    /// Ends the session. The model keeps its target.
    pub fn deactivate(self, ui: &mut impl CompanionUi) {
        tracing::debug!("plane picker deactivated in state {}", self.state());
        ui.hide();
    }

    /// Point the preview plane runs through, confirmed before hover.
    pub fn preview_anchor(&self) -> Option<DVec3> {
        self.confirmed.or(self.hover)
    }

    pub fn preview_plane<C: Camera>(&self, model: &PerspectiveModel<C>) -> Option<Plane> {
        Plane::new(self.preview_anchor()?, model.camera().direction())
    }

    pub fn preview_grid<C: Camera>(
        &self,
        model: &PerspectiveModel<C>,
        viewport: &Viewport,
    ) -> Option<PlaneGrid> {
        if !model.camera().is_perspective() || self.suspended {
            return None;
        }
        PlaneGrid::new(self.preview_anchor()?, model.camera(), viewport)
    }

    /// Visible part of the preview plane, in drawing order.
    pub fn preview_corners<C: Camera>(
        &self,
        model: &PerspectiveModel<C>,
        viewport: &Viewport,
    ) -> Option<[DVec3; 4]> {
        Some(self.preview_grid(model, viewport)?.quad())
    }

    /// Scene bounds grown to hold the preview quad, so the host's clipping
    /// planes don't cut it off.
    pub fn preview_bounds<C: Camera>(
        &self,
        model: &PerspectiveModel<C>,
        viewport: &Viewport,
        scene_bounds: Option<Aabb>,
    ) -> Option<Aabb> {
        let Some(corners) = self.preview_corners(model, viewport) else {
            return scene_bounds;
        };

        let mut bounds = Aabb::from_points(corners)?;
        if let Some(scene_bounds) = scene_bounds {
            bounds.extend(&scene_bounds);
        }
        Some(bounds)
    }

    pub fn status_text<C: Camera>(&self, model: &PerspectiveModel<C>) -> Option<&str> {
        model
            .camera()
            .is_perspective()
            .then_some(self.config.status_text.as_str())
    }

    /// Per-frame hook, the only way the panel learns about camera changes.
    ///
    /// Rebuilds the preview grid from the current camera and viewport and
    /// refreshes the panel if it is visible.
    pub fn tick<C: Camera>(
        &mut self,
        model: &PerspectiveModel<C>,
        viewport: &Viewport,
        ui: &mut impl CompanionUi,
    ) -> Option<PlaneGrid> {
        let grid = self.preview_grid(model, viewport);

        if ui.is_visible() {
            ui.on_view_changed(&DerivedValues::read(model, &self.config.units));
        }

        grid
    }
}
