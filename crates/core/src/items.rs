//! Cart items

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A single cart line.
///
/// Prices are integer minor currency units throughout the engine; no
/// floating point money ever enters a computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Identity key for merge operations.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Owning restaurant, when the item came from one.
    #[serde(default)]
    pub restaurant_id: Option<String>,

    /// Restaurant display name carried alongside the id.
    #[serde(default)]
    pub restaurant_name: Option<String>,

    /// Menu category, used by category-targeted coupons.
    #[serde(default)]
    pub category: Option<String>,

    /// Unit price in minor currency units.
    pub price: i64,

    /// Always greater than zero while the item is in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity for this line.
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Counts the distinct non-empty restaurant ids across the cart.
pub fn distinct_restaurant_count(items: &[CartItem]) -> usize {
    items
        .iter()
        .filter_map(|item| item.restaurant_id.as_deref())
        .filter(|id| !id.is_empty())
        .collect::<FxHashSet<_>>()
        .len()
}

#[cfg(test)]
pub(crate) fn item(id: &str, price: i64, quantity: u32) -> CartItem {
    CartItem {
        id: id.to_string(),
        name: id.to_string(),
        restaurant_id: None,
        restaurant_name: None,
        category: None,
        price,
        quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(item("samosa", 25, 4).line_total(), 100);
    }

    #[test]
    fn distinct_restaurants_ignores_empty_and_missing_ids() {
        let mut a = item("a", 100, 1);
        a.restaurant_id = Some("r1".to_string());
        let mut b = item("b", 100, 1);
        b.restaurant_id = Some("r1".to_string());
        let mut c = item("c", 100, 1);
        c.restaurant_id = Some(String::new());
        let d = item("d", 100, 1);

        assert_eq!(distinct_restaurant_count(&[a, b, c, d]), 1);
    }

    #[test]
    fn distinct_restaurants_counts_each_id_once() {
        let mut items = Vec::new();
        for (id, rest) in [("a", "r1"), ("b", "r2"), ("c", "r3"), ("d", "r2")] {
            let mut i = item(id, 50, 1);
            i.restaurant_id = Some(rest.to_string());
            items.push(i);
        }

        assert_eq!(distinct_restaurant_count(&items), 3);
    }
}
