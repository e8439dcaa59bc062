//! Coupons
//!
//! The discount engine and the client-side coupon validator. Both are
//! pure; neither touches the usage counter. Enforcing the usage limit
//! under concurrent checkouts is the redemption transaction's job in
//! the storage layer.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::items::CartItem;

/// Prefix marking an `item_id` as a category selector rather than an
/// exact item id.
pub const CATEGORY_PREFIX: &str = "CATEGORY:";

/// Cap applied to cart-wide percentage discounts, in minor units.
///
/// Item-targeted percentage discounts are uncapped. The asymmetry is
/// long-standing behaviour of the platform and is kept as an explicit
/// rule rather than silently harmonised.
pub const GLOBAL_PERCENTAGE_CAP: i64 = 100;

/// Discount variants a coupon can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CouponType {
    /// Fixed amount off, bounded by the discountable value.
    Flat,
    /// Percentage of the discountable value.
    Percentage,
    /// Buy one get one: one free unit per two matched.
    Bogo,
    /// Buy two get one: one free unit per three matched.
    B2g1,
}

/// A promo code record in the canonical internal shape.
///
/// Storage adapters map their field-naming conventions onto this
/// struct before anything here runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Record id in the coupon store.
    pub id: String,

    /// Uppercased, unique across the store.
    pub code: String,

    /// Which discount rule applies.
    pub coupon_type: CouponType,

    /// Flat amount in minor units, or percentage points.
    pub value: i64,

    /// Minimum item total for the coupon to apply.
    #[serde(default)]
    pub min_order: i64,

    /// Inactive coupons are rejected up front.
    pub is_active: bool,

    /// Whether the coupon is listed to users; hidden codes still work.
    #[serde(default)]
    pub is_visible: bool,

    /// Total redemptions allowed. A coupon without a positive limit
    /// cannot be redeemed; "unlimited" is not representable.
    #[serde(default)]
    pub usage_limit: i64,

    /// Redemptions so far; mutated only by the redemption transaction.
    #[serde(default)]
    pub used_count: i64,

    /// Restricts the coupon to one restaurant's items.
    #[serde(default)]
    pub restaurant_id: Option<String>,

    /// Exact item id, or a [`CATEGORY_PREFIX`] selector.
    #[serde(default)]
    pub item_id: Option<String>,
}

/// What an item-targeted coupon matches against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CouponTarget<'a> {
    /// Exact item id match.
    Item(&'a str),
    /// Case-insensitive, trimmed category match.
    Category(&'a str),
}

impl Coupon {
    /// Parses `item_id` into a target selector, if the coupon is
    /// targeted at all.
    pub fn target(&self) -> Option<CouponTarget<'_>> {
        let raw = self.item_id.as_deref().filter(|raw| !raw.is_empty())?;

        Some(match raw.strip_prefix(CATEGORY_PREFIX) {
            Some(category) => CouponTarget::Category(category),
            None => CouponTarget::Item(raw),
        })
    }

    /// Whether `used_count` has exhausted a configured limit.
    pub fn limit_reached(&self) -> bool {
        self.usage_limit > 0 && self.used_count >= self.usage_limit
    }
}

fn matches(target: CouponTarget<'_>, item: &CartItem) -> bool {
    match target {
        CouponTarget::Item(id) => item.id == id,
        CouponTarget::Category(name) => item
            .category
            .as_deref()
            .is_some_and(|category| category.trim().eq_ignore_ascii_case(name.trim())),
    }
}

/// Computes the discount a coupon yields against the cart.
///
/// Not-applicable situations (no coupon, under the minimum order, no
/// matching lines) resolve to a zero discount, never an error; the
/// validator explains "why zero" to the user separately.
///
/// Free-unit discounts assume uniform pricing across matched lines
/// and use the first matched line's unit price.
pub fn calculate_discount(coupon: Option<&Coupon>, items: &[CartItem], item_total: i64) -> i64 {
    let Some(coupon) = coupon else {
        return 0;
    };

    if item_total < coupon.min_order {
        return 0;
    }

    if let Some(target) = coupon.target() {
        let matched: SmallVec<[&CartItem; 4]> =
            items.iter().filter(|item| matches(target, item)).collect();

        let Some(first) = matched.first() else {
            return 0;
        };

        let matched_quantity: i64 = matched.iter().map(|item| i64::from(item.quantity)).sum();
        let matched_value: i64 = matched.iter().map(|item| item.line_total()).sum();

        return match coupon.coupon_type {
            CouponType::Bogo => (matched_quantity / 2) * first.price,
            CouponType::B2g1 => (matched_quantity / 3) * first.price,
            CouponType::Percentage => percent_of(matched_value, coupon.value),
            CouponType::Flat => matched_value.min(coupon.value),
        };
    }

    match coupon.coupon_type {
        CouponType::Flat => item_total.min(coupon.value),
        CouponType::Percentage => percent_of(item_total, coupon.value).min(GLOBAL_PERCENTAGE_CAP),
        // free-unit types only make sense against a target
        CouponType::Bogo | CouponType::B2g1 => 0,
    }
}

/// `round(amount * percent / 100)`, half away from zero.
fn percent_of(amount: i64, percent: i64) -> i64 {
    let raw = Decimal::from(amount) * Decimal::from(percent) / Decimal::from(100);

    raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Why a coupon fails pre-flight validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CouponRejection {
    /// The coupon has been switched off.
    #[error("this coupon is no longer active")]
    Inactive,

    /// The cart does not meet the coupon's minimum order.
    #[error("{code} needs a minimum order of {min_order}")]
    BelowMinimum {
        /// The coupon code, for messaging.
        code: String,
        /// The configured minimum, minor units.
        min_order: i64,
    },

    /// Every allowed redemption has been used.
    #[error("this coupon has been fully redeemed")]
    LimitReached,
}

/// Client-side pre-flight check, advisory only.
///
/// Runs before checkout for UX; the redemption transaction remains
/// the sole authority on whether the code may actually be used.
pub fn validate_coupon(coupon: &Coupon, item_total: i64) -> Result<(), CouponRejection> {
    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }

    if item_total < coupon.min_order {
        return Err(CouponRejection::BelowMinimum {
            code: coupon.code.clone(),
            min_order: coupon.min_order,
        });
    }

    if coupon.limit_reached() {
        return Err(CouponRejection::LimitReached);
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn coupon(code: &str, coupon_type: CouponType, value: i64) -> Coupon {
    Coupon {
        id: format!("c-{code}"),
        code: code.to_string(),
        coupon_type,
        value,
        min_order: 0,
        is_active: true,
        is_visible: true,
        usage_limit: 100,
        used_count: 0,
        restaurant_id: None,
        item_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item;

    fn targeted(code: &str, coupon_type: CouponType, value: i64, item_id: &str) -> Coupon {
        Coupon {
            item_id: Some(item_id.to_string()),
            ..coupon(code, coupon_type, value)
        }
    }

    #[test]
    fn no_coupon_is_zero_discount() {
        assert_eq!(calculate_discount(None, &[], 1000), 0);
    }

    #[test]
    fn under_minimum_order_is_zero_not_an_error() {
        let mut flat = coupon("SAVE50", CouponType::Flat, 50);
        flat.min_order = 500;

        assert_eq!(calculate_discount(Some(&flat), &[], 499), 0);
        assert_eq!(calculate_discount(Some(&flat), &[], 500), 50);
    }

    #[test]
    fn bogo_discounts_one_unit_per_two_matched() {
        let bogo = targeted("BOGO", CouponType::Bogo, 0, "momo");
        let items = [item("momo", 50, 5)];

        assert_eq!(calculate_discount(Some(&bogo), &items, 250), 200);
    }

    #[test]
    fn b2g1_discounts_one_unit_per_three_matched() {
        let b2g1 = targeted("B2G1", CouponType::B2g1, 0, "momo");
        let items = [item("momo", 60, 7)];

        assert_eq!(calculate_discount(Some(&b2g1), &items, 420), 2 * 60);
    }

    #[test]
    fn free_unit_price_comes_from_first_matched_line() {
        // uniform pricing is assumed; the first line's price is used
        let bogo = Coupon {
            item_id: Some("CATEGORY:snacks".to_string()),
            ..coupon("BOGO", CouponType::Bogo, 0)
        };

        let mut cheap = item("vada", 30, 1);
        cheap.category = Some("Snacks".to_string());
        let mut dear = item("cutlet", 90, 3);
        dear.category = Some("snacks ".to_string());

        let discount = calculate_discount(Some(&bogo), &[cheap, dear], 300);

        assert_eq!(discount, (4 / 2) * 30);
    }

    #[test]
    fn targeted_percentage_is_uncapped() {
        let percent = targeted("HALF", CouponType::Percentage, 50, "thali");
        let items = [item("thali", 200, 10)];

        assert_eq!(calculate_discount(Some(&percent), &items, 2000), 1000);
    }

    #[test]
    fn targeted_flat_is_bounded_by_matched_value() {
        let flat = targeted("SAVE", CouponType::Flat, 500, "thali");
        let items = [item("thali", 100, 2)];

        assert_eq!(calculate_discount(Some(&flat), &items, 200), 200);
    }

    #[test]
    fn target_with_no_matching_lines_is_zero() {
        let bogo = targeted("BOGO", CouponType::Bogo, 0, "momo");
        let items = [item("thali", 100, 2)];

        assert_eq!(calculate_discount(Some(&bogo), &items, 200), 0);
    }

    #[test]
    fn global_percentage_is_capped() {
        let percent = coupon("HALF", CouponType::Percentage, 50);

        // raw 500, capped to the global limit
        assert_eq!(calculate_discount(Some(&percent), &[], 1000), 100);
        // below the cap the rounded value passes through
        assert_eq!(calculate_discount(Some(&percent), &[], 150), 75);
    }

    #[test]
    fn global_percentage_rounds_half_away_from_zero() {
        let percent = coupon("TINY", CouponType::Percentage, 5);

        // 5% of 30 = 1.5 -> 2
        assert_eq!(calculate_discount(Some(&percent), &[], 30), 2);
    }

    #[test]
    fn global_flat_is_bounded_by_item_total() {
        let flat = coupon("BIG", CouponType::Flat, 900);

        assert_eq!(calculate_discount(Some(&flat), &[], 300), 300);
    }

    #[test]
    fn free_unit_types_do_nothing_cart_wide() {
        let bogo = coupon("BOGO", CouponType::Bogo, 0);

        assert_eq!(calculate_discount(Some(&bogo), &[], 1000), 0);
    }

    #[test]
    fn category_target_parses_through_the_prefix() {
        let c = targeted("X", CouponType::Flat, 10, "CATEGORY:Laundry");

        assert_eq!(c.target(), Some(CouponTarget::Category("Laundry")));

        let direct = targeted("Y", CouponType::Flat, 10, "soap-bar");
        assert_eq!(direct.target(), Some(CouponTarget::Item("soap-bar")));

        let blank = coupon("Z", CouponType::Flat, 10);
        assert_eq!(blank.target(), None);
    }

    #[test]
    fn validator_rejects_inactive_under_minimum_and_exhausted() {
        let mut c = coupon("WELCOME", CouponType::Flat, 50);

        c.is_active = false;
        assert_eq!(validate_coupon(&c, 1000), Err(CouponRejection::Inactive));

        c.is_active = true;
        c.min_order = 300;
        assert_eq!(
            validate_coupon(&c, 200),
            Err(CouponRejection::BelowMinimum {
                code: "WELCOME".to_string(),
                min_order: 300,
            })
        );

        c.used_count = c.usage_limit;
        assert_eq!(
            validate_coupon(&c, 400),
            Err(CouponRejection::LimitReached)
        );

        c.used_count = 0;
        assert_eq!(validate_coupon(&c, 400), Ok(()));
    }

    #[test]
    fn coupon_type_uses_storage_spelling_on_the_wire() -> testresult::TestResult {
        let spelled = serde_norway::to_string(&CouponType::B2g1)?;
        assert_eq!(spelled.trim(), "B2G1");

        let parsed: CouponType = serde_norway::from_str("PERCENTAGE")?;
        assert_eq!(parsed, CouponType::Percentage);

        Ok(())
    }
}
