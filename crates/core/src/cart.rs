//! Cart state machine
//!
//! Cart mutation is a pure reducer over actions: synchronous, total,
//! and free of shared state. Every action has a defined result, and
//! no transition ever leaves a zero-quantity line behind.

use serde::{Deserialize, Serialize};

use crate::{coupons::Coupon, items::CartItem};

/// Delivery details for the current user session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDetails {
    /// Display name.
    pub name: Option<String>,

    /// Contact number for the rider.
    pub phone: Option<String>,

    /// Campus id (or legacy display name) used for the campus fee.
    pub campus: Option<String>,

    /// Hostel block and room.
    pub room: Option<String>,
}

/// Session cart state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartState {
    /// Never contains a line with quantity zero.
    pub items: Vec<CartItem>,

    /// The code of the applied coupon, if any.
    pub coupon_code: Option<String>,

    /// The resolved coupon record the discount engine reads.
    pub active_coupon: Option<Coupon>,

    /// Loaded once per session, updated in place.
    pub user_details: Option<UserDetails>,

    /// UI drawer visibility; carried here so the reducer stays total.
    pub is_drawer_open: bool,
}

/// Actions the cart reducer understands.
#[derive(Clone, Debug)]
pub enum CartAction {
    /// Merge an item into the cart by id, adding its quantity.
    AddItem(CartItem),

    /// Drop a line entirely.
    RemoveItem {
        /// Line identity key.
        id: String,
    },

    /// Apply a signed quantity delta, clamping at zero and pruning.
    UpdateQuantity {
        /// Line identity key.
        id: String,
        /// Signed change in quantity.
        delta: i64,
    },

    /// Empty the cart. An applied coupon does not survive a clear.
    ClearCart,

    /// Attach a resolved coupon to the session.
    ApplyCoupon(Coupon),

    /// Detach any applied coupon.
    RemoveCoupon,

    /// Load or replace the session's user details.
    SetUserDetails(UserDetails),

    /// Open or close the cart drawer.
    SetDrawerOpen(bool),
}

/// The pure, total transition function for the cart.
pub fn reduce(mut state: CartState, action: CartAction) -> CartState {
    match action {
        CartAction::AddItem(item) => {
            if let Some(existing) = state.items.iter_mut().find(|line| line.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                state.items.push(item);
            }

            prune(&mut state.items);
        }
        CartAction::RemoveItem { id } => {
            state.items.retain(|line| line.id != id);
        }
        CartAction::UpdateQuantity { id, delta } => {
            if let Some(existing) = state.items.iter_mut().find(|line| line.id == id) {
                let next = (i64::from(existing.quantity) + delta).max(0);
                existing.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            }

            prune(&mut state.items);
        }
        CartAction::ClearCart => {
            state.items.clear();
            state.coupon_code = None;
            state.active_coupon = None;
        }
        CartAction::ApplyCoupon(coupon) => {
            state.coupon_code = Some(coupon.code.clone());
            state.active_coupon = Some(coupon);
        }
        CartAction::RemoveCoupon => {
            state.coupon_code = None;
            state.active_coupon = None;
        }
        CartAction::SetUserDetails(details) => {
            state.user_details = Some(details);
        }
        CartAction::SetDrawerOpen(open) => {
            state.is_drawer_open = open;
        }
    }

    state
}

fn prune(items: &mut Vec<CartItem>) {
    items.retain(|line| line.quantity > 0);
}
