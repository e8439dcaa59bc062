//! In-memory coupon store.
//!
//! Implements [`CouponsService`] with the same semantics as the
//! relational store: the mutex plays the role of the row lock, so the
//! check and the increment are one atomic step. This is the reference
//! implementation the concurrency tests race against, and it backs
//! offline demos.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tiffin::coupons::Coupon;

use crate::domain::coupons::{
    RedemptionError,
    service::{CouponsService, Redemption, normalize_code},
};

#[derive(Debug, Default)]
pub struct MemoryCouponsService {
    coupons: Mutex<FxHashMap<String, Coupon>>,
}

impl MemoryCouponsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a coupon, keyed by its trimmed, uppercased
    /// code so every lookup path resolves it.
    pub fn insert(&self, coupon: Coupon) {
        let mut coupons = self.coupons.lock().unwrap_or_else(PoisonError::into_inner);

        coupons.insert(coupon.code.trim().to_uppercase(), coupon);
    }

    /// Current usage counters for a code, if it exists.
    pub fn usage(&self, code: &str) -> Option<(i64, i64)> {
        let coupons = self.coupons.lock().unwrap_or_else(PoisonError::into_inner);

        coupons
            .get(&code.trim().to_uppercase())
            .map(|coupon| (coupon.used_count, coupon.usage_limit))
    }
}

#[async_trait]
impl CouponsService for MemoryCouponsService {
    async fn redeem_coupon(&self, code: &str) -> Result<Redemption, RedemptionError> {
        let code = normalize_code(code)?;

        let mut coupons = self.coupons.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(coupon) = coupons.get_mut(&code) else {
            return Err(RedemptionError::NotFound);
        };

        if !coupon.is_active || coupon.usage_limit < 1 {
            return Err(RedemptionError::FailedPrecondition);
        }

        if coupon.used_count >= coupon.usage_limit {
            return Err(RedemptionError::ResourceExhausted);
        }

        coupon.used_count += 1;

        Ok(Redemption {
            code,
            used_count: coupon.used_count,
            usage_limit: coupon.usage_limit,
        })
    }

    async fn get_coupon(&self, code: &str) -> Result<Option<Coupon>, RedemptionError> {
        let code = normalize_code(code)?;

        let coupons = self.coupons.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(coupons.get(&code).cloned())
    }

    async fn list_visible_coupons(&self) -> Result<Vec<Coupon>, RedemptionError> {
        let coupons = self.coupons.lock().unwrap_or_else(PoisonError::into_inner);

        let mut visible: Vec<Coupon> = coupons
            .values()
            .filter(|coupon| coupon.is_visible && coupon.is_active)
            .cloned()
            .collect();

        visible.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(visible)
    }
}
