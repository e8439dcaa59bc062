//! Restaurants Repository

use sqlx::{PgPool, Postgres, query_as};

use crate::domain::restaurants::records::RestaurantRow;

const GET_RESTAURANT_SQL: &str = include_str!("sql/get_restaurant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRestaurantsRepository;

impl PgRestaurantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_restaurant(
        &self,
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<RestaurantRow>, sqlx::Error> {
        query_as::<Postgres, RestaurantRow>(GET_RESTAURANT_SQL)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
