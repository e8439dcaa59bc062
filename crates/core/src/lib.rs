//! Tiffin
//!
//! Tiffin is the order-pricing and coupon engine behind a campus
//! delivery service. Carts of restaurant, grocery and laundry items
//! are priced with a dynamic unit-based delivery surcharge, a
//! per-campus fee, and promo-code discounts, all in integer minor
//! currency units.
//!
//! Everything in this crate is pure and synchronous. The one
//! concurrency-sensitive operation in the system, redeeming a coupon
//! against its usage limit, lives in the storage layer
//! (`tiffin-app`).

pub mod campus;
pub mod cart;
pub mod coupons;
pub mod fixtures;
pub mod items;
pub mod pricing;
pub mod restaurants;
pub mod settings;
