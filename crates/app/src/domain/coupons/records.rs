//! Coupon records
//!
//! Two wire shapes map into the canonical [`Coupon`]: the relational
//! row with snake_case columns, and the document-store export that
//! predates it. The naming duality collapses here, at the adapter
//! boundary, so the engines only ever see one record shape.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde::Deserialize;
use sqlx::{FromRow, Row, postgres::PgRow};
use thiserror::Error;
use tiffin::coupons::{Coupon, CouponType};
use uuid::Uuid;

/// Errors mapping stored records into the canonical coupon shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponMappingError {
    /// The stored discount type is not one the engine knows.
    #[error("unknown coupon type: {0}")]
    UnknownType(String),

    /// The record carries no discount type at all.
    #[error("coupon {0} has no discount type")]
    MissingType(String),
}

fn parse_coupon_type(raw: &str) -> Result<CouponType, CouponMappingError> {
    match raw {
        "FLAT" => Ok(CouponType::Flat),
        "PERCENTAGE" => Ok(CouponType::Percentage),
        "BOGO" => Ok(CouponType::Bogo),
        "B2G1" => Ok(CouponType::B2g1),
        other => Err(CouponMappingError::UnknownType(other.to_string())),
    }
}

/// A coupon row in the relational store.
#[derive(Debug, Clone)]
pub struct CouponRow {
    pub uuid: Uuid,
    pub code: String,
    pub coupon_type: String,
    pub value: i64,
    pub min_order: i64,
    pub is_active: bool,
    pub is_visible: bool,
    pub usage_limit: i64,
    pub used_count: i64,
    pub restaurant_id: Option<String>,
    pub item_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for CouponRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            code: row.try_get("code")?,
            coupon_type: row.try_get("coupon_type")?,
            value: row.try_get("value")?,
            min_order: row.try_get("min_order")?,
            is_active: row.try_get("is_active")?,
            is_visible: row.try_get("is_visible")?,
            usage_limit: row.try_get("usage_limit")?,
            used_count: row.try_get("used_count")?,
            restaurant_id: row.try_get("restaurant_id")?,
            item_id: row.try_get("item_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl CouponRow {
    /// Maps the storage row into the canonical internal record.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponMappingError`] when the stored discount type
    /// is unknown.
    pub fn into_coupon(self) -> Result<Coupon, CouponMappingError> {
        Ok(Coupon {
            id: self.uuid.to_string(),
            code: self.code,
            coupon_type: parse_coupon_type(&self.coupon_type)?,
            value: self.value,
            min_order: self.min_order,
            is_active: self.is_active,
            is_visible: self.is_visible,
            usage_limit: self.usage_limit,
            used_count: self.used_count,
            restaurant_id: self.restaurant_id,
            item_id: self.item_id,
        })
    }
}

/// Usage state returned by the redemption statement and the zero-row
/// classification read.
#[derive(Debug, Clone, Copy)]
pub struct CouponUsage {
    pub usage_limit: i64,
    pub used_count: i64,
    pub is_active: bool,
}

impl<'r> FromRow<'r, PgRow> for CouponUsage {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            usage_limit: row.try_get("usage_limit")?,
            used_count: row.try_get("used_count")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

/// A coupon document as exported by the legacy document store.
///
/// Documents in the wild carry either the internal camelCase field
/// names or the storage-layer snake_case ones, and occasionally both
/// after partial migrations. Both spellings are accepted; the
/// internal spelling wins when a document carries the two.
///
/// Nothing on the live read path constructs this type; it exists for
/// one-off backfills of legacy exports into the relational store, and
/// its tests pin the naming-duality rules those imports rely on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CouponDoc {
    id: Option<String>,
    code: Option<String>,
    #[serde(rename = "type")]
    coupon_type: Option<String>,
    value: Option<i64>,
    #[serde(rename = "minOrder")]
    min_order: Option<i64>,
    #[serde(rename = "min_order")]
    min_order_stored: Option<i64>,
    #[serde(rename = "isActive")]
    is_active: Option<bool>,
    #[serde(rename = "is_active")]
    is_active_stored: Option<bool>,
    #[serde(rename = "isVisible")]
    is_visible: Option<bool>,
    #[serde(rename = "is_visible")]
    is_visible_stored: Option<bool>,
    #[serde(rename = "usageLimit")]
    usage_limit: Option<i64>,
    #[serde(rename = "usage_limit")]
    usage_limit_stored: Option<i64>,
    #[serde(rename = "usedCount")]
    used_count: Option<i64>,
    #[serde(rename = "used_count")]
    used_count_stored: Option<i64>,
    #[serde(rename = "restaurantId")]
    restaurant_id: Option<String>,
    #[serde(rename = "restaurant_id")]
    restaurant_id_stored: Option<String>,
    #[serde(rename = "itemId")]
    item_id: Option<String>,
    #[serde(rename = "item_id")]
    item_id_stored: Option<String>,
}

impl CouponDoc {
    fn min_order(&self) -> i64 {
        self.min_order.or(self.min_order_stored).unwrap_or(0)
    }

    /// Maps the document into the canonical internal record.
    ///
    /// Codes are uppercased on the way in; a missing active flag
    /// means active, matching how the clients read these documents.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponMappingError`] when the discount type is
    /// missing or unknown.
    pub fn into_coupon(self) -> Result<Coupon, CouponMappingError> {
        let code = self.code.clone().unwrap_or_default().trim().to_uppercase();

        let raw_type = self
            .coupon_type
            .as_deref()
            .ok_or_else(|| CouponMappingError::MissingType(code.clone()))?;
        let coupon_type = parse_coupon_type(raw_type)?;

        Ok(Coupon {
            id: self.id.clone().unwrap_or_else(|| code.clone()),
            min_order: self.min_order(),
            code,
            coupon_type,
            value: self.value.unwrap_or(0),
            is_active: self.is_active.or(self.is_active_stored).unwrap_or(true),
            is_visible: self.is_visible.or(self.is_visible_stored).unwrap_or(false),
            usage_limit: self.usage_limit.or(self.usage_limit_stored).unwrap_or(0),
            used_count: self.used_count.or(self.used_count_stored).unwrap_or(0),
            restaurant_id: self.restaurant_id.or(self.restaurant_id_stored),
            item_id: self.item_id.or(self.item_id_stored),
        })
    }
}
