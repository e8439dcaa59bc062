//! Tiffin Domain Concerns

pub mod coupons;
pub mod restaurants;
pub mod settings;
