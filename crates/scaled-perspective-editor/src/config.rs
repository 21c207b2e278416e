use scaled_perspective::units::Units;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Checkerboard cell edge, in logical pixels
    pub grid_cell_size: f64,
    /// Upper bound on checker cells generated per frame
    pub max_grid_cells: usize,
    /// RGBA
    pub preview_color: [u8; 4],
    pub status_text: String,
    /// Not read from config files; hosts set it from their own unit settings.
    #[serde(skip)]
    pub units: Units,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: 40.0,
            max_grid_cells: 4096,
            preview_color: [127, 127, 127, 153],
            status_text: "Pick plane for scale to apply at.".to_string(),
            units: Units::default(),
        }
    }
}
