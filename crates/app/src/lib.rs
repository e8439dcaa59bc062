//! Storage adapters and services for the tiffin pricing core.
//!
//! The pure engines live in the `tiffin` crate; this crate owns every
//! side effect: the coupon redemption transaction, the order-settings
//! snapshot and its refresh loop, and the restaurant catalog lookup.

pub mod database;
pub mod domain;
