//! 领域错误到 HTTP 错误的映射
//!
//! 处理器通过 `?` 直接冒泡领域错误；状态码语义在此集中定义。

use crate::db::repository::RepoError;
use crate::reservations::{AllocationError, LedgerError};
use crate::utils::AppError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Unavailable(msg) => AppError::Unavailable(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidRequest(msg) => AppError::Validation(msg),
            AllocationError::SlotClosed(msg) => AppError::BusinessRule(msg),
            AllocationError::NoCapacity => AppError::BusinessRule(err.to_string()),
            AllocationError::FullyBooked => AppError::Conflict(err.to_string()),
            AllocationError::StorageUnavailable(msg) => AppError::Unavailable(msg),
            AllocationError::Storage(msg) => AppError::Database(msg),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(msg) => AppError::NotFound(msg),
            LedgerError::InvalidTransition { .. } => AppError::BusinessRule(err.to_string()),
            LedgerError::StaleState => AppError::Conflict(err.to_string()),
            LedgerError::StorageUnavailable(msg) => AppError::Unavailable(msg),
            LedgerError::Storage(msg) => AppError::Database(msg),
        }
    }
}
