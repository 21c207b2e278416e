use std::{collections::HashSet, io::Write, path::Path};

use anyhow::{Context, Result};
use glam::DVec3;
use scaled_perspective::{
    geometry::Plane, export::assure_extension, PerspectiveModel, Scale, SceneCamera, Viewport,
};
use scaled_perspective_editor::{Field, HeadlessUi, Session};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;

/// Scripted stand-in for a modelling application: a camera, some pickable
/// planes and the input events a user would produce.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub camera: CameraSpec,
    pub viewport: Viewport,
    #[serde(default)]
    pub planes: Vec<PlaneSpec>,
    /// Overrides the configured default scale
    #[serde(default)]
    pub scale: Option<Scale>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CameraSpec {
    pub eye: DVec3,
    pub target: DVec3,
    #[serde(default = "default_up")]
    pub up: DVec3,
    pub projection: ProjectionSpec,
}

/// Angles in degrees here, converted on the way in.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionSpec {
    Perspective { fov_y: f64 },
    Parallel { height: f64 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlaneSpec {
    pub point: DVec3,
    pub normal: DVec3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Activate,
    Deactivate,
    Move { x: f64, y: f64 },
    Click,
    Cancel,
    Suspend,
    Resume,
    Edit { field: Field, text: String },
    Resize { width: u32, height: u32 },
    Tick,
    Export {
        page_width: f64,
        page_height: f64,
        #[serde(default)]
        path: Option<String>,
    },
}

fn default_up() -> DVec3 {
    DVec3::Z
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading session {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing session {}", path.display()))
    }

    fn camera(&self) -> Result<SceneCamera> {
        let CameraSpec {
            eye,
            target,
            up,
            projection,
        } = self.camera;

        match projection {
            ProjectionSpec::Perspective { fov_y } => {
                SceneCamera::perspective(eye, target, up, fov_y.to_radians())
            }
            ProjectionSpec::Parallel { height } => SceneCamera::parallel(eye, target, up, height),
        }
        .context("camera eye, target and up must span a view")
    }

    fn planes(&self) -> Result<Vec<Plane>> {
        self.planes
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                Plane::new(spec.point, spec.normal)
                    .with_context(|| format!("plane {index} has a zero normal"))
            })
            .collect()
    }

    /// Plays the events, writing one JSON line per tick, edit and export.
    pub fn run(self, config: &Config, out: &mut impl Write) -> Result<()> {
        let scene = self.planes()?;
        let scale = self.scale.unwrap_or(config.default_scale);
        let model = PerspectiveModel::new(self.camera()?, scale)?;
        let mut session = Session::new(
            model,
            HeadlessUi::default(),
            self.viewport,
            config.editor_config(),
        );
        let mut exported = HashSet::new();

        tracing::info!(
            "session: {} events, {} planes, scale {}",
            self.events.len(),
            scene.len(),
            scale
        );

        for event in self.events {
            tracing::debug!("{event:?}");
            match event {
                Event::Activate => session.activate_tool(),
                Event::Deactivate => session.deactivate_tool(),
                Event::Move { x, y } => {
                    session.pointer_move(scene.as_slice(), x, y);
                }
                Event::Click => {
                    if session.click() {
                        tracing::info!("scale target set at {:?}", session.model().target());
                    }
                }
                Event::Cancel => session.cancel(),
                Event::Suspend => session.suspend(),
                Event::Resume => {
                    if let Some(status) = session.resume() {
                        tracing::info!("{status}");
                    }
                }
                Event::Resize { width, height } => session.resize(width, height),
                Event::Tick => {
                    let grid = session.tick();
                    let cell_size = session.config().grid_cell_size;
                    let max_cells = session.config().max_grid_cells;
                    let color = session.config().preview_color;
                    let line = json!({
                        "event": "tick",
                        "state": session.picker().map(|picker| picker.state().to_string()),
                        "panel": session.ui().last_values(),
                        "grid": grid.map(|grid| json!({
                            "corners": grid.quad(),
                            "color": color,
                            "cells": grid.checker_cells(cell_size, max_cells).len(),
                        })),
                    });
                    writeln!(out, "{line}")?;
                }
                Event::Edit { field, text } => {
                    let error = session.edit(field, &text).err().map(|err| err.to_string());
                    let line = json!({
                        "event": "edit",
                        "field": field,
                        "text": text,
                        "accepted": error.is_none(),
                        "error": error,
                        "values": session.derived_values(),
                    });
                    writeln!(out, "{line}")?;
                }
                Event::Export {
                    page_width,
                    page_height,
                    path,
                } => {
                    let line = match session.export_frame() {
                        Some(frame) => {
                            let name = frame.scene_name(|name| exported.contains(name));
                            exported.insert(name.clone());
                            json!({
                                "event": "export",
                                "name": name,
                                "path": path.map(|path| assure_extension(&path, ".pdf")),
                                "frame": frame,
                                "page_bounds": frame.page_bounds(page_width, page_height),
                                "label": frame.target_on_page(page_width, page_height),
                            })
                        }
                        None => {
                            tracing::warn!("nothing to export, image height unavailable");
                            json!({ "event": "export", "frame": null })
                        }
                    };
                    writeln!(out, "{line}")?;
                }
            }
        }

        session.deactivate_tool();
        Ok(())
    }
}
