use glam::DVec3;
use scaled_perspective::{
    export::ExportFrame, geometry::PickScene, Camera, PerspectiveModel, Result, Viewport,
};

use crate::{
    companion::{apply_edit, CompanionUi, DerivedValues, Field},
    config::EditorConfig,
    grid::PlaneGrid,
    picker::PlanePicker,
};

/// Everything the scale tool works on, owned by the host's event loop and
/// passed into each handler. The picker only exists while the tool is active.
pub struct Session<C: Camera, U: CompanionUi> {
    model: PerspectiveModel<C>,
    ui: U,
    viewport: Viewport,
    config: EditorConfig,
    picker: Option<PlanePicker>,
}

impl<C: Camera, U: CompanionUi> Session<C, U> {
    pub fn new(model: PerspectiveModel<C>, ui: U, viewport: Viewport, config: EditorConfig) -> Self {
        Self {
            model,
            ui,
            viewport,
            config,
            picker: None,
        }
    }

    pub fn model(&self) -> &PerspectiveModel<C> {
        &self.model
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn picker(&self) -> Option<&PlanePicker> {
        self.picker.as_ref()
    }

    /// Menu check state
    pub fn tool_active(&self) -> bool {
        self.picker.is_some()
    }

    pub fn activate_tool(&mut self) {
        if self.picker.is_some() {
            tracing::debug!("scale tool already active");
            return;
        }
        self.picker = Some(PlanePicker::activate(
            &self.model,
            &mut self.ui,
            self.config.clone(),
        ));
    }

    pub fn deactivate_tool(&mut self) {
        if let Some(picker) = self.picker.take() {
            picker.deactivate(&mut self.ui);
        }
    }

    pub fn pointer_move<S: PickScene + ?Sized>(&mut self, scene: &S, x: f64, y: f64) -> Option<DVec3> {
        self.picker
            .as_mut()?
            .on_pointer_move(&self.model, &self.viewport, scene, x, y)
    }

    pub fn click(&mut self) -> bool {
        match self.picker.as_mut() {
            Some(picker) => picker.on_click(&mut self.model, &mut self.ui),
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.on_cancel(&mut self.model);
        }
    }

    pub fn suspend(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.on_suspend(&self.model);
        }
    }

    pub fn resume(&mut self) -> Option<&str> {
        self.picker.as_mut()?.on_resume(&self.model)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!("viewport resized to {width}x{height}");
        self.viewport = Viewport::new(width, height);
    }

    /// Panel edit. The new values reach the panel on the next `tick`.
    pub fn edit(&mut self, field: Field, text: &str) -> Result<()> {
        apply_edit(&mut self.model, &self.config.units, field, text)
    }

    /// Call once per rendered frame.
    pub fn tick(&mut self) -> Option<PlaneGrid> {
        self.picker
            .as_mut()?
            .tick(&self.model, &self.viewport, &mut self.ui)
    }

    pub fn derived_values(&self) -> DerivedValues {
        DerivedValues::read(&self.model, &self.config.units)
    }

    pub fn export_frame(&self) -> Option<ExportFrame> {
        ExportFrame::capture(&self.model, &self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companion::HeadlessUi;
    use scaled_perspective::{geometry::Plane, ErrorKind, Scale, SceneCamera};

    fn session() -> Session<SceneCamera, HeadlessUi> {
        let camera = SceneCamera::perspective(
            DVec3::new(0.0, -5000.0, 0.0),
            DVec3::ZERO,
            DVec3::Z,
            60f64.to_radians(),
        )
        .unwrap();
        let model = PerspectiveModel::new(camera, Scale::default()).unwrap();
        Session::new(
            model,
            HeadlessUi::default(),
            Viewport::new(800, 600),
            EditorConfig::default(),
        )
    }

    fn wall() -> Plane {
        Plane::new(DVec3::ZERO, DVec3::Y).unwrap()
    }

    #[test]
    fn inactive_tool_ignores_input() {
        let mut session = session();
        assert!(!session.tool_active());
        assert!(session.pointer_move(&wall(), 400.0, 300.0).is_none());
        assert!(!session.click());
        assert!(session.tick().is_none());
        assert_eq!(session.model().target(), None);
    }

    #[test]
    fn pick_then_edit() {
        let mut session = session();
        session.activate_tool();
        assert!(session.tool_active());

        session.pointer_move(&wall(), 400.0, 300.0);
        assert!(session.click());
        assert!(session.ui().is_visible());

        session.edit(Field::ImageHeight, "90").unwrap();
        session.tick();
        assert_eq!(
            session.ui().last_values().unwrap().image_height.as_deref(),
            Some("90mm")
        );

        let frame = session.export_frame().unwrap();
        assert!((frame.image_width - 120.0).abs() < 1e-9);

        session.deactivate_tool();
        assert!(!session.tool_active());
        assert!(!session.ui().is_visible());
        assert_eq!(session.derived_values().image_height.as_deref(), Some("90mm"));
    }

    #[test]
    fn rejected_edit_leaves_camera() {
        let mut session = session();
        let eye = session.model().camera().eye();

        let err = session.edit(Field::ViewingDistance, "300").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        let err = session.edit(Field::Scale, "abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        assert_eq!(session.model().camera().eye(), eye);
        assert_eq!(session.model().scale(), Scale::default());
    }

    #[test]
    fn resize_moves_the_grid() {
        let mut session = session();
        session.activate_tool();
        session.pointer_move(&wall(), 400.0, 300.0);

        let wide = session.tick().unwrap();
        session.resize(400, 600);
        let narrow = session.tick().unwrap();
        assert!(wide.corners()[1].x > narrow.corners()[1].x);

        session.resize(0, 0);
        assert!(session.tick().is_none());
        assert!(session.export_frame().is_none());
    }

    #[test]
    fn cancel_and_reactivate() {
        let mut session = session();
        session.activate_tool();
        session.activate_tool();
        session.pointer_move(&wall(), 400.0, 300.0);
        session.click();
        session.cancel();
        assert_eq!(session.model().target(), None);
        assert!(!session.derived_values().can_set_image_height);

        session.suspend();
        assert!(session.tick().is_none());
        assert!(session.resume().is_some());
    }
}
