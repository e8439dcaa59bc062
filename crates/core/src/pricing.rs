//! Pricing engine
//!
//! Pure functions from cart contents and configuration to money.
//! Everything here is synchronous, allocation-light and safe to call
//! from any number of request handlers at once.

use serde::Serialize;

use crate::{
    campus,
    cart::UserDetails,
    items::{CartItem, distinct_restaurant_count},
    restaurants::Restaurant,
    settings::{OrderSettings, Setting},
};

/// Fallback base delivery charge, minor units.
pub const DEFAULT_BASE_DELIVERY_CHARGE: i64 = 30;

/// Fallback weight-unit threshold included in the base charge.
pub const DEFAULT_EXTRA_ITEM_THRESHOLD: i64 = 3;

/// Fallback charge per surcharge unit, minor units.
pub const DEFAULT_EXTRA_ITEM_CHARGE: i64 = 10;

/// Fallback light-item count per extra surcharge unit.
pub const DEFAULT_LIGHT_ITEM_THRESHOLD: i64 = 5;

/// Weight units contributed by one heavy item.
pub const HEAVY_ITEM_WEIGHT: i64 = 3;

/// Added to the base charge for every restaurant beyond the first.
pub const MULTI_RESTAURANT_STEP: i64 = 10;

/// Breakdown of a delivery-charge computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryQuote {
    /// The full charge: base, surcharges and campus fee.
    pub delivery_charge: i64,

    /// The campus component alone, for display.
    pub campus_delivery_charge: i64,

    /// Whether any cart line is a heavy item.
    pub has_heavy_items: bool,

    /// Whether the cart spans more than one restaurant.
    pub is_multi_restaurant: bool,
}

/// Sum of `price * quantity` over the cart. Zero for an empty cart.
pub fn calculate_item_total(items: &[CartItem]) -> i64 {
    items.iter().map(CartItem::line_total).sum()
}

/// Resolves a charge parameter through the precedence chain:
/// order settings, then restaurant override, then hardcoded default.
fn resolve(from_settings: Setting, from_restaurant: Setting, default: i64) -> i64 {
    from_settings.or(from_restaurant).resolve(default)
}

/// Computes the delivery charge for a cart.
///
/// The charge is the resolved base, plus a step per extra restaurant,
/// plus the unit-based large-order surcharge, plus the campus fee for
/// the user's selected campus. An empty cart prices as base plus
/// campus fee.
pub fn calculate_delivery_charge(
    items: &[CartItem],
    settings: Option<&OrderSettings>,
    restaurant: Option<&Restaurant>,
    user: Option<&UserDetails>,
) -> DeliveryQuote {
    let setting = |field: fn(&OrderSettings) -> Setting| settings.map_or(Setting::ABSENT, field);
    let overridden = |field: fn(&Restaurant) -> Setting| restaurant.map_or(Setting::ABSENT, field);

    let mut base = resolve(
        setting(|s| s.base_delivery_charge),
        overridden(|r| r.base_delivery_charge),
        DEFAULT_BASE_DELIVERY_CHARGE,
    );
    let threshold = resolve(
        setting(|s| s.extra_item_threshold),
        overridden(|r| r.extra_item_threshold),
        DEFAULT_EXTRA_ITEM_THRESHOLD,
    );
    let extra_charge = resolve(
        setting(|s| s.extra_item_charge),
        overridden(|r| r.extra_item_charge),
        DEFAULT_EXTRA_ITEM_CHARGE,
    );
    let light_threshold = setting(|s| s.light_item_threshold).resolve(DEFAULT_LIGHT_ITEM_THRESHOLD);

    let distinct_restaurants = distinct_restaurant_count(items);
    let is_multi_restaurant = distinct_restaurants > 1;

    if is_multi_restaurant {
        base += (distinct_restaurants as i64 - 1) * MULTI_RESTAURANT_STEP;
    }

    let is_heavy = |id: &str| settings.is_some_and(|s| s.heavy_items.contains(id));
    let is_light = |id: &str| settings.is_some_and(|s| s.light_items.contains(id));

    let mut weight_units = 0_i64;
    let mut light_count = 0_i64;
    let mut has_heavy_items = false;

    for item in items {
        let quantity = i64::from(item.quantity);

        // Heavy wins when an id is listed in both sets; the order of
        // these checks is the classification rule.
        if is_heavy(&item.id) {
            has_heavy_items = true;
            weight_units += HEAVY_ITEM_WEIGHT * quantity;
        } else if is_light(&item.id) {
            light_count += quantity;
        } else {
            weight_units += quantity;
        }
    }

    let extra_weight_units = (weight_units - threshold).max(0);
    // A light threshold of zero or less would divide by zero; such a
    // configuration contributes nothing.
    let extra_light_units = if light_threshold > 0 {
        light_count / light_threshold
    } else {
        0
    };
    let large_order_surcharge = (extra_weight_units + extra_light_units) * extra_charge;

    let campus_delivery_charge =
        campus::campus_delivery_charge(settings, user.and_then(|u| u.campus.as_deref()));

    DeliveryQuote {
        delivery_charge: base + large_order_surcharge + campus_delivery_charge,
        campus_delivery_charge,
        has_heavy_items,
        is_multi_restaurant,
    }
}

/// The derived totals of a priced cart. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Sum of line totals.
    pub item_total: i64,
    /// Full delivery charge.
    pub delivery_charge: i64,
    /// Coupon discount after clamping.
    pub discount: i64,
    /// `item_total + delivery_charge - discount`, never negative.
    pub final_total: i64,
}

impl Totals {
    /// Combines pricing and discount results.
    ///
    /// The discount is clamped to the payable amount so the final
    /// total cannot go negative by construction.
    pub fn new(item_total: i64, delivery_charge: i64, discount: i64) -> Self {
        let discount = discount.clamp(0, item_total + delivery_charge);

        Self {
            item_total,
            delivery_charge,
            discount,
            final_total: item_total + delivery_charge - discount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item;

    fn settings_with(heavy: &[&str], light: &[&str]) -> OrderSettings {
        OrderSettings {
            heavy_items: heavy.iter().map(ToString::to_string).collect(),
            light_items: light.iter().map(ToString::to_string).collect(),
            ..OrderSettings::default()
        }
    }

    #[test]
    fn item_total_is_sum_of_line_totals() {
        let items = [item("a", 120, 2), item("b", 45, 3)];

        assert_eq!(calculate_item_total(&items), 375);
        assert_eq!(calculate_item_total(&[]), 0);
    }

    #[test]
    fn empty_cart_prices_as_base_plus_campus_fee() {
        let quote = calculate_delivery_charge(&[], None, None, None);

        assert_eq!(quote.delivery_charge, DEFAULT_BASE_DELIVERY_CHARGE);
        assert_eq!(quote.campus_delivery_charge, 0);
        assert!(!quote.has_heavy_items);
        assert!(!quote.is_multi_restaurant);
    }

    #[test]
    fn heavy_items_count_triple_towards_weight_units() {
        // 2 heavy items: 6 weight units, 3 over the default threshold
        let settings = settings_with(&["cylinder"], &[]);
        let items = [item("cylinder", 500, 2)];

        let quote = calculate_delivery_charge(&items, Some(&settings), None, None);

        assert_eq!(
            quote.delivery_charge,
            DEFAULT_BASE_DELIVERY_CHARGE + 3 * DEFAULT_EXTRA_ITEM_CHARGE
        );
        assert!(quote.has_heavy_items);
    }

    #[test]
    fn light_items_convert_by_threshold_division() {
        let settings = settings_with(&[], &["maggi"]);
        let items = [item("maggi", 14, 12)];

        let quote = calculate_delivery_charge(&items, Some(&settings), None, None);

        // floor(12 / 5) = 2 extra units, no weight units at all
        assert_eq!(
            quote.delivery_charge,
            DEFAULT_BASE_DELIVERY_CHARGE + 2 * DEFAULT_EXTRA_ITEM_CHARGE
        );
    }

    #[test]
    fn zero_light_threshold_contributes_nothing() {
        let mut settings = settings_with(&[], &["maggi"]);
        settings.light_item_threshold = Setting::from_value(0);
        let items = [item("maggi", 14, 40)];

        let quote = calculate_delivery_charge(&items, Some(&settings), None, None);

        assert_eq!(quote.delivery_charge, DEFAULT_BASE_DELIVERY_CHARGE);
    }

    #[test]
    fn heavy_wins_when_listed_in_both_sets() {
        let settings = settings_with(&["crate"], &["crate"]);
        let items = [item("crate", 100, 1)];

        let quote = calculate_delivery_charge(&items, Some(&settings), None, None);

        assert!(quote.has_heavy_items);
        // 3 weight units, exactly at threshold: no surcharge
        assert_eq!(quote.delivery_charge, DEFAULT_BASE_DELIVERY_CHARGE);
    }

    #[test]
    fn each_extra_restaurant_adds_a_step() {
        let mut items = Vec::new();
        for (id, rest) in [("a", "r1"), ("b", "r2"), ("c", "r3")] {
            let mut i = item(id, 50, 1);
            i.restaurant_id = Some(rest.to_string());
            items.push(i);
        }

        let quote = calculate_delivery_charge(&items, None, None, None);

        assert!(quote.is_multi_restaurant);
        assert_eq!(
            quote.delivery_charge,
            DEFAULT_BASE_DELIVERY_CHARGE + 2 * MULTI_RESTAURANT_STEP
        );
    }

    #[test]
    fn precedence_is_settings_then_restaurant_then_default() {
        let mut settings = OrderSettings::default();
        settings.extra_item_charge = Setting::from_value(25);

        let restaurant = Restaurant {
            id: "r1".to_string(),
            name: "R1".to_string(),
            base_delivery_charge: Setting::from_value(50),
            extra_item_charge: Setting::from_value(99),
            ..Restaurant::default()
        };

        let items = [item("a", 10, 5)]; // 5 weight units, 2 over threshold

        let quote =
            calculate_delivery_charge(&items, Some(&settings), Some(&restaurant), None);

        // base from restaurant override, extra charge from settings
        assert_eq!(quote.delivery_charge, 50 + 2 * 25);
    }

    #[test]
    fn campus_fee_is_added_from_user_selection() {
        let user = UserDetails {
            campus: Some("lake".to_string()),
            ..UserDetails::default()
        };

        let quote = calculate_delivery_charge(&[], None, None, Some(&user));

        assert_eq!(quote.campus_delivery_charge, 20);
        assert_eq!(quote.delivery_charge, DEFAULT_BASE_DELIVERY_CHARGE + 20);
    }

    #[test]
    fn surcharge_is_monotonic_in_weight_units() {
        let mut last = 0;
        for quantity in 1..=20 {
            let items = [item("a", 10, quantity)];
            let quote = calculate_delivery_charge(&items, None, None, None);

            assert!(
                quote.delivery_charge >= last,
                "charge decreased at quantity {quantity}"
            );
            last = quote.delivery_charge;
        }
    }

    #[test]
    fn totals_clamp_discount_to_payable_amount() {
        let totals = Totals::new(100, 30, 500);

        assert_eq!(totals.discount, 130);
        assert_eq!(totals.final_total, 0);

        let plain = Totals::new(100, 30, 40);
        assert_eq!(plain.final_total, 90);
    }
}
