pub mod account_service;
pub mod affiliate_service;
pub mod business_service;
pub mod catalog_service;
pub mod list_service;
pub mod notification_service;
pub mod points_service;
pub mod punch_service;
pub mod receipt_service;
pub mod redemption_service;

pub use account_service::AccountService;
pub use affiliate_service::AffiliateService;
pub use business_service::BusinessService;
pub use catalog_service::CatalogService;
pub use list_service::ListService;
pub use notification_service::NotificationService;
pub use points_service::PointsService;
pub use punch_service::PunchService;
pub use receipt_service::ReceiptService;
pub use redemption_service::RedemptionService;

use thiserror::Error;

use crate::database::manager::DatabaseError;

/// Shared service-layer error. Maps onto `ApiError` at the handler boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Manager(#[from] DatabaseError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ServiceError::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServiceError::Forbidden(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ServiceError::Invalid(msg.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
