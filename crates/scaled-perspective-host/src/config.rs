use std::path::Path;

use anyhow::{Context, Result};
use scaled_perspective::{
    units::{LengthUnit, Units},
    Scale,
};
use scaled_perspective_editor::EditorConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_scale: Scale,
    pub scene_unit: LengthUnit,
    pub display_unit: LengthUnit,
    pub display_precision: usize,
    pub editor: EditorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_scale: Scale::default(),
            scene_unit: LengthUnit::Millimeter,
            display_unit: LengthUnit::Millimeter,
            display_precision: 1,
            editor: EditorConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Editor settings with the top level units applied. Units always come
    /// from the top level, `editor` has no unit settings of its own.
    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            units: Units {
                scene: self.scene_unit,
                display: self.display_unit,
                precision: self.display_precision,
            },
            ..self.editor.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "default_scale": "1:50",
                "display_unit": "cm",
                "editor": { "grid_cell_size": 20 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_scale, Scale::new(1.0, 50.0));
        let editor = config.editor_config();
        assert_eq!(editor.grid_cell_size, 20.0);
        assert_eq!(editor.max_grid_cells, 4096);
        assert_eq!(editor.units.display, LengthUnit::Centimeter);
        assert_eq!(editor.units.scene, LengthUnit::Millimeter);
    }

    #[test]
    fn top_level_units_win() {
        let config: Config = serde_json::from_str(
            r#"{
                "display_unit": "cm",
                "display_precision": 2,
                "editor": { "units": { "display": "m", "precision": 0 } }
            }"#,
        )
        .unwrap();

        let units = config.editor_config().units;
        assert_eq!(units.display, LengthUnit::Centimeter);
        assert_eq!(units.precision, 2);
        assert_eq!(config.editor.units, Units::default());
    }

    #[test]
    fn bad_scale_is_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "default_scale": "1:-4" }"#).is_err());
    }
}
