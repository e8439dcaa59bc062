//! Order settings
//!
//! The process-wide configuration document, fetched once per session.
//! It originates in an administrator-edited document store, so every
//! numeric field may be missing, a number, a numeric string, an empty
//! string or null. [`Setting`] absorbs that looseness at the edge so
//! the engines only ever see `Option<i64>`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize};

use crate::campus::CampusEntry;

/// A numeric setting as delivered by the document store.
///
/// A setting is explicit only when the raw value parses to a base-10
/// integer. Empty strings, nulls, unparseable text and non-finite
/// floats are all absent, and fall through the precedence chain
/// (settings, then restaurant override, then hardcoded default)
/// rather than being read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Setting(Option<i64>);

impl Setting {
    /// An absent setting.
    pub const ABSENT: Self = Self(None);

    /// An explicit value.
    pub const fn from_value(value: i64) -> Self {
        Self(Some(value))
    }

    /// The explicit value, if any.
    pub const fn value(self) -> Option<i64> {
        self.0
    }

    /// This setting when explicit, otherwise `other`.
    pub const fn or(self, other: Self) -> Self {
        match self.0 {
            Some(_) => self,
            None => other,
        }
    }

    /// Resolve to the explicit value or the given default.
    pub fn resolve(self, default: i64) -> i64 {
        self.0.unwrap_or(default)
    }
}

impl From<i64> for Setting {
    fn from(value: i64) -> Self {
        Self::from_value(value)
    }
}

/// The shapes a setting may take on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSetting {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawSetting {
    fn normalize(self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(n),
            #[expect(clippy::cast_possible_truncation, reason = "truncation matches integer parsing of the source data")]
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

impl<'de> Deserialize<'de> for Setting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawSetting>::deserialize(deserializer)?;

        Ok(Self(raw.and_then(RawSetting::normalize)))
    }
}

/// The order settings document in its canonical shape.
///
/// Storage-layer field naming is mapped to this shape by the adapter
/// that fetched the document; the engines never see wire names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    /// Base delivery charge before surcharges, minor units.
    pub base_delivery_charge: Setting,

    /// Weight units included before the large-order surcharge starts.
    pub extra_item_threshold: Setting,

    /// Charge per surcharge unit, minor units.
    pub extra_item_charge: Setting,

    /// Light items per extra surcharge unit.
    pub light_item_threshold: Setting,

    /// Item ids that count triple towards weight units.
    pub heavy_items: FxHashSet<String>,

    /// Item ids tallied separately from weight units.
    pub light_items: FxHashSet<String>,

    /// Per-campus fee and slot table; empty means use the built-in
    /// default table.
    pub delivery_campus_config: Vec<CampusEntry>,
}
