//! Restaurants Service

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tiffin::restaurants::Restaurant;

use crate::{
    database::Db,
    domain::restaurants::{records::RestaurantRow, repository::PgRestaurantsRepository},
};

/// Restaurant catalog errors.
#[derive(Debug, Error)]
pub enum RestaurantsServiceError {
    /// Storage failure reading the catalog.
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

#[automock]
#[async_trait]
pub trait RestaurantsService: Send + Sync {
    /// The override record for a restaurant, if the catalog has one.
    async fn get_restaurant(
        &self,
        id: &str,
    ) -> Result<Option<Restaurant>, RestaurantsServiceError>;
}

#[derive(Debug, Clone)]
pub struct PgRestaurantsService {
    db: Db,
    restaurants: PgRestaurantsRepository,
}

impl PgRestaurantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            restaurants: PgRestaurantsRepository::new(),
        }
    }
}

#[async_trait]
impl RestaurantsService for PgRestaurantsService {
    #[tracing::instrument(name = "restaurants.service.get", skip(self), err)]
    async fn get_restaurant(
        &self,
        id: &str,
    ) -> Result<Option<Restaurant>, RestaurantsServiceError> {
        let row = self.restaurants.get_restaurant(self.db.pool(), id).await?;

        Ok(row.map(RestaurantRow::into_restaurant))
    }
}
