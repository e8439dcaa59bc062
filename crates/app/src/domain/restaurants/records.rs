//! Restaurant Records

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Row, postgres::PgRow};
use tiffin::{restaurants::Restaurant, settings::Setting};

/// A restaurant override row in the catalog.
#[derive(Debug, Clone)]
pub struct RestaurantRow {
    pub id: String,
    pub name: String,
    pub base_delivery_charge: Option<i64>,
    pub extra_item_threshold: Option<i64>,
    pub extra_item_charge: Option<i64>,
    pub min_order_amount: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for RestaurantRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            base_delivery_charge: row.try_get("base_delivery_charge")?,
            extra_item_threshold: row.try_get("extra_item_threshold")?,
            extra_item_charge: row.try_get("extra_item_charge")?,
            min_order_amount: row.try_get("min_order_amount")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl RestaurantRow {
    /// Maps the row into the canonical override record. Null columns
    /// become absent settings so the precedence chain applies.
    pub fn into_restaurant(self) -> Restaurant {
        let setting = |value: Option<i64>| value.map_or(Setting::ABSENT, Setting::from_value);

        Restaurant {
            id: self.id,
            name: self.name,
            base_delivery_charge: setting(self.base_delivery_charge),
            extra_item_threshold: setting(self.extra_item_threshold),
            extra_item_charge: setting(self.extra_item_charge),
            min_order_amount: setting(self.min_order_amount),
        }
    }
}
