//! Campus delivery configuration
//!
//! Resolves the effective per-campus fee and slot table. An explicit
//! table in the order settings wins; otherwise a built-in default
//! table of named campuses applies. An unknown campus is never an
//! error: it prices as zero surcharge with no slots available.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::settings::OrderSettings;

/// A delivery time window offered on a campus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySlot {
    /// Window start, wall-clock `HH:MM`.
    pub start: String,
    /// Window end, wall-clock `HH:MM`.
    pub end: String,
}

impl DeliverySlot {
    /// Convenience constructor for table literals.
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// One campus in the delivery table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusEntry {
    /// Primary lookup key.
    pub id: String,

    /// Display name; also matched for legacy records keyed by name.
    pub name: String,

    /// Flat per-order fee for this campus, minor units.
    #[serde(default)]
    pub delivery_charge: i64,

    /// Delivery windows offered on this campus.
    #[serde(default)]
    pub slots: Vec<DeliverySlot>,
}

static DEFAULT_CAMPUS_TABLE: LazyLock<Vec<CampusEntry>> = LazyLock::new(|| {
    let entry = |id: &str, name: &str, delivery_charge: i64, slots: Vec<DeliverySlot>| CampusEntry {
        id: id.to_string(),
        name: name.to_string(),
        delivery_charge,
        slots,
    };
    let midday = DeliverySlot::new("11:30", "13:30");
    let evening = DeliverySlot::new("18:00", "20:30");

    vec![
        entry("north", "North Campus", 0, vec![midday.clone(), evening.clone()]),
        entry("south", "South Campus", 10, vec![midday.clone(), evening.clone()]),
        entry("lake", "Lakeside Hostels", 20, vec![evening.clone()]),
        entry("city", "City Extension", 30, vec![midday, evening]),
    ]
});

/// The built-in campus table used when no override is configured.
pub fn default_campus_table() -> &'static [CampusEntry] {
    &DEFAULT_CAMPUS_TABLE
}

/// The configured campus list when present and non-empty, otherwise
/// the built-in default table.
pub fn effective_campuses(settings: Option<&OrderSettings>) -> &[CampusEntry] {
    match settings {
        Some(settings) if !settings.delivery_campus_config.is_empty() => {
            &settings.delivery_campus_config
        }
        _ => default_campus_table(),
    }
}

/// Looks up a campus by id, falling back to display name for legacy
/// records that were keyed by name.
pub fn find_campus<'a>(campuses: &'a [CampusEntry], query: &str) -> Option<&'a CampusEntry> {
    campuses
        .iter()
        .find(|campus| campus.id == query)
        .or_else(|| campuses.iter().find(|campus| campus.name == query))
}

/// Fee for the given campus selection.
///
/// A missing selection or unknown campus is zero, never an error.
pub fn campus_delivery_charge(settings: Option<&OrderSettings>, campus: Option<&str>) -> i64 {
    campus
        .and_then(|query| find_campus(effective_campuses(settings), query))
        .map_or(0, |campus| campus.delivery_charge)
}

/// Slots for the given campus selection; empty when unknown.
pub fn campus_slots<'a>(settings: Option<&'a OrderSettings>, campus: Option<&str>) -> &'a [DeliverySlot] {
    campus
        .and_then(|query| find_campus(effective_campuses(settings), query))
        .map_or(&[], |campus| campus.slots.as_slice())
}
