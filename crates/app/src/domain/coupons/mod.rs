//! Coupons

pub mod errors;
pub mod memory;
pub mod records;
mod repository;
pub mod service;

pub use errors::RedemptionError;
pub use memory::MemoryCouponsService;
pub use service::*;
