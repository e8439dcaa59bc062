//! Order Settings Service

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tiffin::settings::OrderSettings;

use crate::{database::Db, domain::settings::repository::PgSettingsRepository};

/// Order settings service errors.
#[derive(Debug, Error)]
pub enum SettingsServiceError {
    /// Storage failure fetching the settings row.
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

/// A settings snapshot with the version it was published under.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    /// Monotonic document version.
    pub version: i64,
    /// The canonical settings the engines consume.
    pub settings: OrderSettings,
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// The latest settings snapshot, if the document exists.
    async fn fetch_order_settings(
        &self,
    ) -> Result<Option<SettingsSnapshot>, SettingsServiceError>;
}

#[derive(Debug, Clone)]
pub struct PgSettingsService {
    db: Db,
    settings: PgSettingsRepository,
}

impl PgSettingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            settings: PgSettingsRepository::new(),
        }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    #[tracing::instrument(name = "settings.service.fetch", skip(self), err)]
    async fn fetch_order_settings(
        &self,
    ) -> Result<Option<SettingsSnapshot>, SettingsServiceError> {
        let Some(row) = self.settings.get_order_settings(self.db.pool()).await? else {
            return Ok(None);
        };

        Ok(Some(SettingsSnapshot {
            version: row.version,
            settings: row.payload.into_settings(),
        }))
    }
}
