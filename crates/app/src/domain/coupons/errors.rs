//! Redemption endpoint errors.

use thiserror::Error;

/// Terminal failure categories of the redemption endpoint.
///
/// These five codes are the externally observable contract of the
/// redemption transaction; clients key their messaging off [`code`]
/// and must treat every one of them as final rather than retry.
/// Transient store conflicts are retried inside the service and never
/// reach a caller while attempts remain.
///
/// [`code`]: RedemptionError::code
#[derive(Debug, Error)]
pub enum RedemptionError {
    /// The request carried no usable coupon code.
    #[error("a coupon code is required")]
    InvalidArgument,

    /// No coupon exists for the code.
    #[error("coupon not found")]
    NotFound,

    /// The coupon is not redeemable in its current state: it has been
    /// switched off, or it carries no explicit positive usage limit
    /// ("unlimited" is not representable).
    #[error("coupon is not open for redemption")]
    FailedPrecondition,

    /// Every redemption slot has been consumed.
    #[error("coupon usage limit reached")]
    ResourceExhausted,

    /// The store failed in a way the caller can only retry manually.
    #[error("coupon store failure")]
    Internal(#[source] sqlx::Error),
}

impl RedemptionError {
    /// The wire tag for client-side messaging.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid-argument",
            Self::NotFound => "not-found",
            Self::FailedPrecondition => "failed-precondition",
            Self::ResourceExhausted => "resource-exhausted",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<sqlx::Error> for RedemptionError {
    fn from(error: sqlx::Error) -> Self {
        Self::Internal(error)
    }
}

/// Whether a store error is a transient conflict worth retrying.
///
/// Serialization failures and deadlocks resolve themselves on replay;
/// everything else is surfaced as `internal`.
pub(crate) fn is_retryable(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "40001" || code == "40P01")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_are_stable() {
        assert_eq!(RedemptionError::InvalidArgument.code(), "invalid-argument");
        assert_eq!(RedemptionError::NotFound.code(), "not-found");
        assert_eq!(
            RedemptionError::FailedPrecondition.code(),
            "failed-precondition"
        );
        assert_eq!(
            RedemptionError::ResourceExhausted.code(),
            "resource-exhausted"
        );
        assert_eq!(
            RedemptionError::Internal(sqlx::Error::PoolClosed).code(),
            "internal"
        );
    }

    #[test]
    fn plain_sqlx_errors_are_not_retryable() {
        assert!(!is_retryable(&sqlx::Error::PoolClosed));
        assert!(!is_retryable(&sqlx::Error::RowNotFound));
    }
}
