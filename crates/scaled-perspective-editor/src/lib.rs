pub mod companion;
pub mod config;
pub mod grid;
pub mod picker;
pub mod session;

pub use companion::{apply_edit, CompanionUi, DerivedValues, Field, HeadlessUi};
pub use config::EditorConfig;
pub use grid::PlaneGrid;
pub use picker::{PickerState, PlanePicker};
pub use session::Session;
