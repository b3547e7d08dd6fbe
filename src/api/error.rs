// ==========================================
// 焊接工时计算系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户可读的错误消息
// 约束: 输入校验失败时不得产生任何状态变更
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据文件保存失败: {0}")]
    StorageError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }

            // 数据文件错误
            RepositoryError::FileIoError(msg) => ApiError::StorageError(msg),
            RepositoryError::SerializationError(msg) => ApiError::StorageError(msg),

            RepositoryError::ExportError(msg) => ApiError::ExportError(msg),
        }
    }
}

impl ApiError {
    /// 面向最终用户的消息（输入类错误只返回已本地化的原因）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidInput(msg)
            | ApiError::NotFound(msg)
            | ApiError::BusinessRuleViolation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "calculation".to_string(),
            id: "42".to_string(),
        };
        match ApiError::from(repo_err) {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("calculation"));
                assert!(msg.contains("42"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let repo_err = RepositoryError::FileIoError("disk full".to_string());
        assert!(matches!(ApiError::from(repo_err), ApiError::StorageError(msg) if msg == "disk full"));

        let repo_err = RepositoryError::ExportError("bad sheet".to_string());
        assert!(matches!(ApiError::from(repo_err), ApiError::ExportError(_)));
    }

    #[test]
    fn test_database_errors_keep_their_category() {
        let repo_err = RepositoryError::DatabaseConnectionError("locked".to_string());
        assert!(matches!(
            ApiError::from(repo_err),
            ApiError::DatabaseConnectionError(msg) if msg == "locked"
        ));

        let repo_err = RepositoryError::DatabaseQueryError("no such table".to_string());
        assert!(matches!(ApiError::from(repo_err), ApiError::DatabaseError(_)));

        let repo_err = RepositoryError::ForeignKeyViolation("calculation_meter".to_string());
        match ApiError::from(repo_err) {
            ApiError::BusinessRuleViolation(msg) => assert!(msg.contains("calculation_meter")),
            other => panic!("Expected BusinessRuleViolation, got {:?}", other),
        }

        let repo_err = RepositoryError::SerializationError("eof".to_string());
        assert!(matches!(ApiError::from(repo_err), ApiError::StorageError(_)));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(ApiError::InvalidInput("zły kod".to_string()).user_message(), "zły kod");
        assert_eq!(
            ApiError::StorageError("disk full".to_string()).user_message(),
            "数据文件保存失败: disk full"
        );
    }
}
