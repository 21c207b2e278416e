use scaled_perspective::{units::Units, Camera, PerspectiveModel, Result, Scale};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Panel showing the scale and its derived values next to the view.
///
/// There is no camera observer; the picker calls `on_view_changed` from its
/// per-frame tick while the panel is visible.
pub trait CompanionUi {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
    fn on_view_changed(&mut self, values: &DerivedValues);
}

/// What the panel displays, already formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedValues {
    pub scale: String,
    #[serde(rename = "viewDistance")]
    pub viewing_distance: Option<String>,
    pub image_height: Option<String>,
    #[serde(rename = "canSetViewDistance")]
    pub can_set_viewing_distance: bool,
    pub can_set_image_height: bool,
}

impl DerivedValues {
    pub fn read<C: Camera>(model: &PerspectiveModel<C>, units: &Units) -> Self {
        Self {
            scale: model.scale().to_string(),
            viewing_distance: model.viewing_distance().map(|value| units.format(value)),
            image_height: model.image_height().map(|value| units.format(value)),
            can_set_viewing_distance: model.can_set_viewing_distance(),
            can_set_image_height: model.can_set_image_height(),
        }
    }
}

/// Editable panel fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Scale,
    ViewingDistance,
    ImageHeight,
}

/// Applies text typed into a panel field. An `Err` means the field should be
/// marked invalid; the model and camera are untouched in that case.
pub fn apply_edit<C: Camera>(
    model: &mut PerspectiveModel<C>,
    units: &Units,
    field: Field,
    text: &str,
) -> Result<()> {
    let result = match field {
        Field::Scale => text.parse::<Scale>().and_then(|scale| model.set_scale(scale)),
        Field::ViewingDistance => units
            .parse(text)
            .and_then(|value| model.set_viewing_distance(value)),
        Field::ImageHeight => units
            .parse(text)
            .and_then(|value| model.set_image_height(value)),
    };

    match &result {
        Ok(()) => tracing::debug!("{field} set to {text:?}"),
        Err(err) => tracing::warn!("{field} edit {text:?} rejected: {err}"),
    }

    result
}

/// Panel stand-in that remembers what it was told, for hosts without a GUI.
#[derive(Debug, Clone, Default)]
pub struct HeadlessUi {
    visible: bool,
    last_values: Option<DerivedValues>,
    updates: usize,
}

impl HeadlessUi {
    pub fn last_values(&self) -> Option<&DerivedValues> {
        self.last_values.as_ref()
    }

    /// How many view change notifications arrived
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl CompanionUi for HeadlessUi {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn on_view_changed(&mut self, values: &DerivedValues) {
        self.last_values = Some(values.clone());
        self.updates += 1;
    }
}
