//! Order Settings Repository

use sqlx::{PgPool, Postgres, query_as};

use crate::domain::settings::records::OrderSettingsRow;

const GET_ORDER_SETTINGS_SQL: &str = include_str!("sql/get_order_settings.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSettingsRepository;

impl PgSettingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The latest settings row, if one has ever been written.
    pub(crate) async fn get_order_settings(
        &self,
        pool: &PgPool,
    ) -> Result<Option<OrderSettingsRow>, sqlx::Error> {
        query_as::<Postgres, OrderSettingsRow>(GET_ORDER_SETTINGS_SQL)
            .fetch_optional(pool)
            .await
    }
}
