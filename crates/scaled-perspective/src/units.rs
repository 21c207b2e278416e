use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{Result, ScaledPerspectiveError};

/// Units a length can be typed or displayed in.
///
/// All model math happens in one "scene length unit"; these only matter at
/// the text boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum LengthUnit {
    #[default]
    #[strum(to_string = "mm", serialize = "millimeter", serialize = "millimeters")]
    #[serde(rename = "mm", alias = "millimeter")]
    Millimeter,
    #[strum(to_string = "cm", serialize = "centimeter", serialize = "centimeters")]
    #[serde(rename = "cm", alias = "centimeter")]
    Centimeter,
    #[strum(to_string = "m", serialize = "meter", serialize = "meters")]
    #[serde(rename = "m", alias = "meter")]
    Meter,
    #[strum(to_string = "in", serialize = "\"", serialize = "inch", serialize = "inches")]
    #[serde(rename = "in", alias = "inch")]
    Inch,
    #[strum(to_string = "ft", serialize = "'", serialize = "foot", serialize = "feet")]
    #[serde(rename = "ft", alias = "foot")]
    Foot,
}

impl LengthUnit {
    pub fn millimeters(self) -> f64 {
        match self {
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Meter => 1000.0,
            Self::Inch => 25.4,
            Self::Foot => 304.8,
        }
    }

    pub fn convert(self, value: f64, to: LengthUnit) -> f64 {
        value * self.millimeters() / to.millimeters()
    }
}

/// Unit context of a model: what a bare number means in the scene, and how
/// lengths are shown back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Units {
    pub scene: LengthUnit,
    pub display: LengthUnit,
    pub precision: usize,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            scene: LengthUnit::Millimeter,
            display: LengthUnit::Millimeter,
            precision: 1,
        }
    }
}

impl Units {
    /// Text without a suffix is read in the display unit.
    pub fn parse(&self, text: &str) -> Result<f64> {
        parse_length(text, self.display, self.scene)
    }

    pub fn format(&self, value: f64) -> String {
        format_length(value, self.scene, self.display, self.precision)
    }
}

/// Parses user text like `350`, `35 cm`, `1,5m` or `14"` into scene units.
/// Only strictly positive finite lengths are accepted.
pub fn parse_length(text: &str, default_unit: LengthUnit, scene_unit: LengthUnit) -> Result<f64> {
    let normalized = text.trim().replace(',', ".");
    let (number, suffix) = normalized.split_at(number_len(&normalized));

    let value = number
        .trim()
        .parse::<f64>()
        .map_err(|_| ScaledPerspectiveError::InvalidLength(text.to_string()))?;

    let suffix = suffix.trim();
    let unit = if suffix.is_empty() {
        default_unit
    } else {
        suffix
            .parse::<LengthUnit>()
            .map_err(|_| ScaledPerspectiveError::UnknownUnit(suffix.to_string()))?
    };

    let value = unit.convert(value, scene_unit);
    if !(value.is_finite() && value > 0.0) {
        return Err(ScaledPerspectiveError::NonPositiveLength(value));
    }

    Ok(value)
}

/// Length of the leading number, exponent included (`1e3`, `2.5E-1`).
fn number_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut len = 0;
    while let Some(&byte) = bytes.get(len) {
        let exponent = matches!(byte, b'e' | b'E')
            && len > 0
            && bytes
                .get(len + 1)
                .is_some_and(|next| next.is_ascii_digit() || matches!(next, b'-' | b'+'));
        if byte.is_ascii_digit() || matches!(byte, b'.' | b'-' | b'+') || exponent {
            len += 1;
        } else {
            break;
        }
    }
    len
}

pub fn format_length(
    value: f64,
    scene_unit: LengthUnit,
    display_unit: LengthUnit,
    precision: usize,
) -> String {
    let value = scene_unit.convert(value, display_unit);
    format!("{}{}", trim_number(&format!("{value:.precision$}")), display_unit)
}

pub(crate) fn trim_number(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
