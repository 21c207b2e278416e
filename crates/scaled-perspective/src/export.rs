//! Read-only numbers an exporter needs to reproduce the scaled view on paper.
//!
//! Nothing here writes files; PDF and page-layout encoders take an
//! `ExportFrame` and place the image where `page_bounds` says.

use glam::{DVec2, DVec3};
use serde::Serialize;

use crate::{camera::Camera, perspective::PerspectiveModel, scale::Scale, viewport::Viewport};

/// Rectangle on a page, top-left origin, in the page's paper units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds2 {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFrame {
    pub scale: Scale,
    pub image_width: f64,
    pub image_height: f64,
    pub target: Option<DVec3>,
    /// Where the target shows up in the viewport, perspective only.
    pub target_pixel: Option<DVec2>,
    pub viewport: Viewport,
}

impl ExportFrame {
    /// None while the image height is unavailable or the viewport is empty.
    pub fn capture<C: Camera>(model: &PerspectiveModel<C>, viewport: &Viewport) -> Option<Self> {
        if viewport.is_empty() {
            return None;
        }

        let image_height = model.image_height()?;
        let image_width = image_height / viewport.height as f64 * viewport.width as f64;

        let target_pixel = match model.target() {
            Some(target) if model.camera().is_perspective() => {
                viewport.project(model.camera(), target)
            }
            _ => None,
        };

        Some(Self {
            scale: model.scale(),
            image_width,
            image_height,
            target: model.target(),
            target_pixel,
            viewport: *viewport,
        })
    }

    /// Image centered on a page of the given size.
    pub fn page_bounds(&self, page_width: f64, page_height: f64) -> Bounds2 {
        Bounds2 {
            left: page_width / 2.0 - self.image_width / 2.0,
            top: page_height / 2.0 - self.image_height / 2.0,
            width: self.image_width,
            height: self.image_height,
        }
    }

    /// Anchor for a scale label pointing at the target.
    pub fn target_on_page(&self, page_width: f64, page_height: f64) -> Option<DVec2> {
        let pixel = self.target_pixel?;
        let bounds = self.page_bounds(page_width, page_height);
        let size = self.viewport.size();

        Some(DVec2::new(
            bounds.left + pixel.x / size.x * bounds.width,
            bounds.top + pixel.y / size.y * bounds.height,
        ))
    }

    /// `"1:100 View"`, or `"1:100 View 1"`, `"1:100 View 2"`, ... if taken.
    pub fn scene_name(&self, exists: impl Fn(&str) -> bool) -> String {
        let basename = format!("{} View", self.scale);
        if !exists(&basename) {
            return basename;
        }

        let mut count = 1;
        loop {
            let name = format!("{basename} {count}");
            if !exists(&name) {
                return name;
            }
            count += 1;
        }
    }
}

pub fn assure_extension(path: &str, extension: &str) -> String {
    if path.ends_with(extension) {
        path.to_string()
    } else {
        format!("{path}{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::SceneCamera;

    fn model() -> PerspectiveModel<SceneCamera> {
        let camera = SceneCamera::perspective(
            DVec3::new(0.0, -5000.0, 0.0),
            DVec3::ZERO,
            DVec3::Z,
            60f64.to_radians(),
        )
        .unwrap();
        PerspectiveModel::new(camera, Scale::parse("1:100")).unwrap()
    }

    #[test]
    fn needs_image_height() {
        let viewport = Viewport::new(800, 600);
        let mut model = model();
        assert!(ExportFrame::capture(&model, &viewport).is_none());

        model.set_target(Some(DVec3::ZERO));
        assert!(ExportFrame::capture(&model, &Viewport::new(0, 600)).is_none());
        assert!(ExportFrame::capture(&model, &viewport).is_some());
    }

    #[test]
    fn image_centered_on_page() {
        let viewport = Viewport::new(800, 600);
        let mut model = model();
        model.set_target(Some(DVec3::ZERO));
        model.set_image_height(90.0).unwrap();

        let frame = ExportFrame::capture(&model, &viewport).unwrap();
        assert!((frame.image_width - 120.0).abs() < 1e-9);

        let bounds = frame.page_bounds(297.0, 210.0);
        assert!((bounds.left - 88.5).abs() < 1e-9);
        assert!((bounds.top - 60.0).abs() < 1e-9);

        // target sits dead center of the view, so of the page too
        let label = frame.target_on_page(297.0, 210.0).unwrap();
        assert!(label.abs_diff_eq(DVec2::new(148.5, 105.0), 1e-6));
    }

    #[test]
    fn scene_name_skips_taken() {
        let viewport = Viewport::new(800, 600);
        let mut model = model();
        model.set_target(Some(DVec3::ZERO));
        let frame = ExportFrame::capture(&model, &viewport).unwrap();

        assert_eq!(frame.scene_name(|_| false), "1:100 View");
        let taken = ["1:100 View", "1:100 View 1"];
        assert_eq!(frame.scene_name(|name| taken.contains(&name)), "1:100 View 2");
    }

    #[test]
    fn extension_added_once() {
        assert_eq!(assure_extension("plan", ".pdf"), "plan.pdf");
        assert_eq!(assure_extension("plan.pdf", ".pdf"), "plan.pdf");
    }
}
