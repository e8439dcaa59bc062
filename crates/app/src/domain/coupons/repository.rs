//! Coupons Repository
//!
//! The redemption statement is a single conditional update: the row
//! is the lock, the predicate is the business rule, and the affected
//! row count is the verdict. No read-then-write pair exists to race.

use sqlx::{PgPool, Postgres, query_as};

use crate::domain::coupons::records::{CouponRow, CouponUsage};

const REDEEM_COUPON_SQL: &str = include_str!("sql/redeem_coupon.sql");
const GET_COUPON_USAGE_SQL: &str = include_str!("sql/get_coupon_usage.sql");
const GET_COUPON_BY_CODE_SQL: &str = include_str!("sql/get_coupon_by_code.sql");
const GET_VISIBLE_COUPONS_SQL: &str = include_str!("sql/get_visible_coupons.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Consumes one redemption slot if the coupon is active and any
    /// slot remains.
    ///
    /// Returns the updated counters, or `None` when no row qualified:
    /// the code is unknown, the coupon is switched off, the limit is
    /// not positive, or every slot is used. [`usage`](Self::usage)
    /// distinguishes those cases.
    pub(crate) async fn redeem(
        &self,
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<CouponUsage>, sqlx::Error> {
        query_as::<Postgres, CouponUsage>(REDEEM_COUPON_SQL)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Reads the usage counters for zero-row classification.
    pub(crate) async fn usage(
        &self,
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<CouponUsage>, sqlx::Error> {
        query_as::<Postgres, CouponUsage>(GET_COUPON_USAGE_SQL)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub(crate) async fn get_by_code(
        &self,
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<CouponRow>, sqlx::Error> {
        query_as::<Postgres, CouponRow>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub(crate) async fn list_visible(&self, pool: &PgPool) -> Result<Vec<CouponRow>, sqlx::Error> {
        query_as::<Postgres, CouponRow>(GET_VISIBLE_COUPONS_SQL)
            .fetch_all(pool)
            .await
    }
}
