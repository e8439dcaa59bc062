//! End-to-end checkout totals

use testresult::TestResult;
use tiffin::{
    coupons::calculate_discount,
    fixtures::Fixture,
    pricing::{Totals, calculate_delivery_charge, calculate_item_total},
    restaurants::min_order_shortfalls,
};

const HOSTEL_GROCERY_RUN: &str = r"
settings:
  base_delivery_charge: 20
  extra_item_threshold: 4
  extra_item_charge: 5
  light_item_threshold: 5
  heavy_items: [water-can]
  light_items: [maggi]
  delivery_campus_config:
    - id: annex
      name: Annex Block
      delivery_charge: 15
      slots: [{ start: '18:00', end: '20:30' }]
user:
  campus: annex
items:
  - id: water-can
    name: 20L Water Can
    restaurant_id: mart
    price: 80
    quantity: 2
  - id: maggi
    name: Instant Noodles
    restaurant_id: mart
    price: 14
    quantity: 12
  - id: bread
    name: Bread Loaf
    restaurant_id: mart
    price: 40
    quantity: 1
coupon:
  id: c-1
  code: GROCER10
  coupon_type: PERCENTAGE
  value: 10
  min_order: 100
  is_active: true
restaurants:
  - id: mart
    name: Campus Mart
    min_order_amount: 100
";

#[test]
fn grocery_run_prices_end_to_end() -> TestResult {
    let fixture = Fixture::from_yaml(HOSTEL_GROCERY_RUN)?;

    let item_total = calculate_item_total(&fixture.items);
    assert_eq!(item_total, 2 * 80 + 12 * 14 + 40);

    let quote = calculate_delivery_charge(
        &fixture.items,
        fixture.settings.as_ref(),
        None,
        fixture.user.as_ref(),
    );

    // weight: 2 heavy * 3 + 1 bread = 7, threshold 4 -> 3 extra units
    // light: floor(12 / 5) = 2 extra units
    // 20 base + 5 units * 5 + 15 campus
    assert_eq!(quote.delivery_charge, 20 + 5 * 5 + 15);
    assert_eq!(quote.campus_delivery_charge, 15);
    assert!(quote.has_heavy_items);
    assert!(!quote.is_multi_restaurant);

    // cart-wide 10% of 368 = 36.8 -> 37, under the global cap
    let discount = calculate_discount(fixture.coupon.as_ref(), &fixture.items, item_total);
    assert_eq!(discount, 37);

    let totals = Totals::new(item_total, quote.delivery_charge, discount);
    assert_eq!(totals.final_total, 368 + 60 - 37);

    // the mart minimum of 100 is comfortably met
    assert!(min_order_shortfalls(&fixture.items, &fixture.restaurants).is_empty());

    Ok(())
}

const SPLIT_DINNER: &str = r"
items:
  - id: biryani
    name: Veg Biryani
    restaurant_id: spice-house
    restaurant_name: Spice House
    price: 180
    quantity: 1
  - id: momo
    name: Steamed Momos
    restaurant_id: wok-this-way
    restaurant_name: Wok This Way
    category: Snacks
    price: 50
    quantity: 5
coupon:
  id: c-2
  code: MOMODEAL
  coupon_type: BOGO
  value: 0
  is_active: true
  item_id: momo
restaurants:
  - id: spice-house
    name: Spice House
    min_order_amount: 250
  - id: wok-this-way
    name: Wok This Way
";

#[test]
fn split_dinner_surcharges_and_blocks_on_minimums() -> TestResult {
    let fixture = Fixture::from_yaml(SPLIT_DINNER)?;

    let item_total = calculate_item_total(&fixture.items);
    assert_eq!(item_total, 180 + 250);

    let quote = calculate_delivery_charge(&fixture.items, None, None, None);

    // defaults: base 30 + one extra restaurant * 10; 6 weight units,
    // 3 over the default threshold at 10 each
    assert!(quote.is_multi_restaurant);
    assert_eq!(quote.delivery_charge, 30 + 10 + 3 * 10);

    // BOGO on 5 momos at 50: floor(5 / 2) * 50
    let discount = calculate_discount(fixture.coupon.as_ref(), &fixture.items, item_total);
    assert_eq!(discount, 200);

    // Spice House is 70 short of its minimum; checkout must block
    let shortfalls = min_order_shortfalls(&fixture.items, &fixture.restaurants);
    assert_eq!(shortfalls.len(), 1);
    assert_eq!(shortfalls[0].restaurant_id, "spice-house");
    assert_eq!(shortfalls[0].shortfall, 70);

    Ok(())
}
