//! Coupons Service
//!
//! The server-side authority on coupon usage. The pre-flight checks
//! in the core crate are advisory; only [`CouponsService::redeem_coupon`]
//! decides whether a code may actually be used, and it guarantees at
//! most `usage_limit` successful redemptions under any number of
//! concurrent callers.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use rand::Rng;
use serde::Serialize;
use tiffin::coupons::Coupon;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::coupons::{
        RedemptionError,
        errors::is_retryable,
        records::CouponMappingError,
        repository::PgCouponsRepository,
    },
};

/// Attempts made against transient store conflicts before giving up.
pub const MAX_REDEEM_ATTEMPTS: u32 = 5;

const RETRY_BASE_DELAY_MS: u64 = 25;
const RETRY_JITTER_MS: u64 = 25;

/// A successful redemption receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redemption {
    /// The normalized coupon code that was redeemed.
    pub code: String,
    /// The counter after this redemption.
    pub used_count: i64,
    /// The configured ceiling.
    pub usage_limit: i64,
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Atomically consume one redemption slot for the code.
    ///
    /// Fails terminally with one of the five tagged categories; never
    /// over-redeems, whatever the concurrency.
    async fn redeem_coupon(&self, code: &str) -> Result<Redemption, RedemptionError>;

    /// Fetch a coupon by code in the canonical shape.
    async fn get_coupon(&self, code: &str) -> Result<Option<Coupon>, RedemptionError>;

    /// List active, user-visible coupons.
    async fn list_visible_coupons(&self) -> Result<Vec<Coupon>, RedemptionError>;
}

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    coupons: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            coupons: PgCouponsRepository::new(),
        }
    }

    async fn classify_zero_rows(&self, code: &str) -> RedemptionError {
        match self.coupons.usage(self.db.pool(), code).await {
            Ok(None) => RedemptionError::NotFound,
            Ok(Some(usage)) if !usage.is_active || usage.usage_limit < 1 => {
                RedemptionError::FailedPrecondition
            }
            Ok(Some(_)) => RedemptionError::ResourceExhausted,
            Err(error) => RedemptionError::Internal(error),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.redeem",
        skip(self, code),
        fields(
            coupon_code = tracing::field::Empty,
            attempts = tracing::field::Empty,
            used_count = tracing::field::Empty
        ),
        err
    )]
    async fn redeem_coupon(&self, code: &str) -> Result<Redemption, RedemptionError> {
        let code = normalize_code(code)?;

        let span = Span::current();
        span.record("coupon_code", tracing::field::display(&code));

        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.coupons.redeem(self.db.pool(), &code).await {
                Ok(Some(usage)) => {
                    span.record("attempts", attempt);
                    span.record("used_count", usage.used_count);

                    info!(coupon_code = %code, used_count = usage.used_count, "redeemed coupon");

                    return Ok(Redemption {
                        code,
                        used_count: usage.used_count,
                        usage_limit: usage.usage_limit,
                    });
                }
                Ok(None) => return Err(self.classify_zero_rows(&code).await),
                Err(error) if is_retryable(&error) && attempt < MAX_REDEEM_ATTEMPTS => {
                    tokio::time::sleep(backoff(attempt)).await;
                }
                Err(error) => return Err(RedemptionError::Internal(error)),
            }
        }
    }

    #[tracing::instrument(name = "coupons.service.get", skip(self, code), err)]
    async fn get_coupon(&self, code: &str) -> Result<Option<Coupon>, RedemptionError> {
        let code = normalize_code(code)?;

        let Some(row) = self.coupons.get_by_code(self.db.pool(), &code).await? else {
            return Ok(None);
        };

        Ok(Some(row.into_coupon().map_err(mapping_failure)?))
    }

    #[tracing::instrument(name = "coupons.service.list_visible", skip(self), err)]
    async fn list_visible_coupons(&self) -> Result<Vec<Coupon>, RedemptionError> {
        let rows = self.coupons.list_visible(self.db.pool()).await?;

        rows.into_iter()
            .map(|row| row.into_coupon().map_err(mapping_failure))
            .collect()
    }
}

/// Trims and uppercases the code; a blank request never reaches the
/// store.
pub(crate) fn normalize_code(code: &str) -> Result<String, RedemptionError> {
    let code = code.trim().to_uppercase();

    if code.is_empty() {
        return Err(RedemptionError::InvalidArgument);
    }

    Ok(code)
}

/// An unmappable stored record is an operator problem, not a caller
/// problem: surface it as `internal`.
fn mapping_failure(error: CouponMappingError) -> RedemptionError {
    RedemptionError::Internal(sqlx::Error::Decode(Box::new(error)))
}

fn backoff(attempt: u32) -> Duration {
    let jitter = rand::thread_rng().gen_range(0..RETRY_JITTER_MS);

    Duration::from_millis(RETRY_BASE_DELAY_MS * u64::from(attempt) + jitter)
}
