//! Order Settings Records
//!
//! The settings document is stored as a single versioned jsonb row.
//! The payload keeps the internal camelCase field names it has always
//! had in the document store; the mapping to the canonical engine
//! shape happens here and nowhere else.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde::Deserialize;
use sqlx::{FromRow, Row, postgres::PgRow, types::Json};
use tiffin::{
    campus::{CampusEntry, DeliverySlot},
    settings::{OrderSettings, Setting},
};

/// The stored settings row.
#[derive(Debug, Clone)]
pub struct OrderSettingsRow {
    pub version: i64,
    pub payload: OrderSettingsDoc,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for OrderSettingsRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            version: row.try_get("version")?,
            payload: row.try_get::<Json<OrderSettingsDoc>, _>("payload")?.0,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

/// The settings payload in its document-store shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderSettingsDoc {
    pub base_delivery_charge: Setting,
    pub extra_item_threshold: Setting,
    pub extra_item_charge: Setting,
    pub light_item_threshold: Setting,
    pub heavy_items: Vec<String>,
    pub light_items: Vec<String>,
    pub delivery_campus_config: Vec<CampusEntryDoc>,
}

/// One campus entry in the document shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampusEntryDoc {
    pub id: String,
    pub name: String,
    /// Loose on the wire; a non-numeric fee reads as zero.
    pub delivery_charge: Setting,
    pub slots: Vec<DeliverySlotDoc>,
}

/// One delivery window in the document shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeliverySlotDoc {
    pub start: String,
    pub end: String,
}

impl OrderSettingsDoc {
    /// Maps the document into the canonical engine shape.
    pub fn into_settings(self) -> OrderSettings {
        OrderSettings {
            base_delivery_charge: self.base_delivery_charge,
            extra_item_threshold: self.extra_item_threshold,
            extra_item_charge: self.extra_item_charge,
            light_item_threshold: self.light_item_threshold,
            heavy_items: self.heavy_items.into_iter().collect(),
            light_items: self.light_items.into_iter().collect(),
            delivery_campus_config: self
                .delivery_campus_config
                .into_iter()
                .map(CampusEntryDoc::into_entry)
                .collect(),
        }
    }
}

impl CampusEntryDoc {
    fn into_entry(self) -> CampusEntry {
        CampusEntry {
            id: self.id,
            name: self.name,
            delivery_charge: self.delivery_charge.resolve(0),
            slots: self
                .slots
                .into_iter()
                .map(|slot| DeliverySlot {
                    start: slot.start,
                    end: slot.end,
                })
                .collect(),
        }
    }
}
