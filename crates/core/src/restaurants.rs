//! Restaurant catalog records and per-restaurant minimums

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{items::CartItem, settings::Setting};

/// The per-restaurant override record from the catalog.
///
/// Every numeric field is optional; absent values fall through to the
/// order settings and then the hardcoded defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Catalog key, referenced by [`CartItem::restaurant_id`].
    pub id: String,

    /// Display name.
    pub name: String,

    /// Override for the base delivery charge.
    #[serde(default)]
    pub base_delivery_charge: Setting,

    /// Override for the weight-unit threshold.
    #[serde(default)]
    pub extra_item_threshold: Setting,

    /// Override for the per-unit surcharge.
    #[serde(default)]
    pub extra_item_charge: Setting,

    /// Minimum item total this restaurant accepts per order.
    #[serde(default)]
    pub min_order_amount: Setting,
}

/// A restaurant in the cart whose subtotal is below its minimum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MinOrderShortfall {
    /// The restaurant under its minimum.
    pub restaurant_id: String,
    /// Display name for messaging.
    pub restaurant_name: String,
    /// The configured minimum, minor units.
    pub min_amount: i64,
    /// The cart subtotal for this restaurant.
    pub current_total: i64,
    /// How much is missing.
    pub shortfall: i64,
}

/// Finds every restaurant in the cart with a configured minimum the
/// current subtotal does not meet.
///
/// Checkout is blocked while any shortfall exists, so a
/// multi-restaurant cart cannot undercut one restaurant by padding
/// another.
pub fn min_order_shortfalls(
    items: &[CartItem],
    restaurants: &[Restaurant],
) -> Vec<MinOrderShortfall> {
    let mut subtotals: FxHashMap<&str, i64> = FxHashMap::default();

    for item in items {
        let Some(id) = item.restaurant_id.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };

        *subtotals.entry(id).or_insert(0) += item.line_total();
    }

    restaurants
        .iter()
        .filter_map(|restaurant| {
            let min_amount = restaurant.min_order_amount.value().unwrap_or(0);

            if min_amount <= 0 {
                return None;
            }

            let current_total = subtotals.get(restaurant.id.as_str()).copied()?;

            (current_total < min_amount).then(|| MinOrderShortfall {
                restaurant_id: restaurant.id.clone(),
                restaurant_name: restaurant.name.clone(),
                min_amount,
                current_total,
                shortfall: min_amount - current_total,
            })
        })
        .collect()
}
