use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaledPerspectiveError};

/// Ratio based architectural scale, e.g. `1:100`.
///
/// `numerator` represented units stand for `denominator` real units, so
/// `factor()` multiplies a scene length into a paper length. A bare number
/// `N` is read as `1:N`.
///
/// Values are immutable; an edit replaces the whole scale. Malformed text still
/// produces a `Scale`, just one whose `is_valid()` is false and which has no
/// factor. Equality and hashing go through the factor, so `1:50` equals `2:100`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scale {
    numerator: f64,
    denominator: f64,
}

impl Scale {
    pub const INVALID: Self = Self {
        numerator: f64::NAN,
        denominator: f64::NAN,
    };

    pub fn new(numerator: f64, denominator: f64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Scale for a plain multiplier. Factors below one render as `1:N`, others as `N:1`.
    pub fn from_factor(factor: f64) -> Self {
        if !(factor.is_finite() && factor > 0.0) {
            Self::INVALID
        } else if factor < 1.0 {
            Self::new(1.0, 1.0 / factor)
        } else {
            Self::new(factor, 1.0)
        }
    }

    /// Never fails, see `is_valid()`. Use `str::parse` for a `Result`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        let (numerator, denominator) = match text.split_once(':') {
            Some((n, d)) => (parse_component(n), parse_component(d)),
            None => (Some(1.0), parse_component(text)),
        };

        match (numerator, denominator) {
            (Some(n), Some(d)) => Self::new(n, d),
            _ => Self::INVALID,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_positive(self.numerator) && is_positive(self.denominator)
    }

    pub fn numerator(&self) -> f64 {
        self.numerator
    }

    pub fn denominator(&self) -> f64 {
        self.denominator
    }

    pub fn factor(&self) -> Option<f64> {
        self.is_valid().then(|| self.numerator / self.denominator)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(1.0, 100.0)
    }
}

fn parse_component(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok()
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl PartialEq for Scale {
    fn eq(&self, other: &Self) -> bool {
        self.factor().map(OrderedFloat) == other.factor().map(OrderedFloat)
    }
}

impl Eq for Scale {}

impl Hash for Scale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.factor().map(OrderedFloat).hash(state);
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            // f64's Display is already the shortest form, no trailing zeros
            write!(f, "{}:{}", self.numerator, self.denominator)
        } else {
            f.write_str("invalid")
        }
    }
}

impl FromStr for Scale {
    type Err = ScaledPerspectiveError;

    fn from_str(s: &str) -> Result<Self> {
        let scale = Self::parse(s);
        if scale.is_valid() {
            Ok(scale)
        } else {
            Err(ScaledPerspectiveError::InvalidScale(s.to_string()))
        }
    }
}

impl TryFrom<String> for Scale {
    type Error = ScaledPerspectiveError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Scale> for String {
    fn from(value: Scale) -> Self {
        value.to_string()
    }
}
