//! YAML fixtures
//!
//! Bundles of engine inputs for conformance tests and examples.

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::UserDetails, coupons::Coupon, items::CartItem, restaurants::Restaurant,
    settings::OrderSettings,
};

/// Fixture parsing errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading a fixture file.
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse fixture YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// A bundle of engine inputs loaded from YAML.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    /// Order settings snapshot, if the scenario configures one.
    pub settings: Option<OrderSettings>,

    /// Cart contents.
    pub items: Vec<CartItem>,

    /// Catalog records referenced by the cart.
    pub restaurants: Vec<Restaurant>,

    /// An applied coupon, if the scenario has one.
    pub coupon: Option<Coupon>,

    /// The ordering user.
    pub user: Option<UserDetails>,
}

impl Fixture {
    /// Loads a fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] when the file cannot be read or the
    /// YAML does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Parses a fixture from inline YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError::Yaml`] when the YAML does not parse.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }
}
