use serde::{Deserialize, Serialize};

/// Quantity of a component within its parent, as stored on the parent edge
///
/// The legacy column is free-form, so the value keeps an explicit state for
/// "nothing stored" and for "stored but not a number" instead of coercing
/// either one silently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Quantity {
    /// No quantity recorded; counts as one when flattening
    #[default]
    Unspecified,
    Amount(f64),
    /// Raw text that could not be read as a number
    Malformed(String),
}

impl Quantity {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
            return Quantity::Unspecified;
        };

        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Quantity::Amount(value),
            _ => Quantity::Malformed(text.to_string()),
        }
    }

    pub fn amount(value: f64) -> Self {
        if value.is_finite() {
            Quantity::Amount(value)
        } else {
            Quantity::Malformed(value.to_string())
        }
    }

    /// Whole-unit multiplicity used for counting, rounded down
    ///
    /// `Unspecified` counts as one and negative amounts as zero. Returns
    /// `None` for malformed values so the caller decides how to report them.
    pub fn multiplicity(&self) -> Option<u64> {
        match self {
            Quantity::Unspecified => Some(1),
            Quantity::Amount(value) if *value <= 0.0 => Some(0),
            Quantity::Amount(value) => Some(value.floor() as u64),
            Quantity::Malformed(_) => None,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Quantity::Unspecified)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Unspecified => Ok(()),
            Quantity::Amount(value) if value.fract() == 0.0 => write!(f, "{}", *value as i64),
            Quantity::Amount(value) => write!(f, "{}", value),
            Quantity::Malformed(raw) => write!(f, "{}", raw),
        }
    }
}

impl From<Option<String>> for Quantity {
    fn from(value: Option<String>) -> Self {
        Quantity::parse(value.as_deref())
    }
}

impl From<Quantity> for Option<String> {
    fn from(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Unspecified => None,
            other => Some(other.to_string()),
        }
    }
}
