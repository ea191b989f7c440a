// ==========================================
// 教师课时薪酬系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/引擎错误为用户友好的错误消息
// ==========================================

use crate::engine::error::SalaryError;
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

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// 学期薪酬已计算或已关闭, 班级数据不可再修改
    #[error("学期已锁定: semester_id={semester_id}, 薪酬配置状态={status}")]
    SemesterLocked { semester_id: i64, status: String },

    #[error("薪酬计算失败: {0}")]
    CalculationError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
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
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("取值约束违反: {}", msg))
            }
            err @ RepositoryError::MalformedColumn { .. } => ApiError::DatabaseError(err.to_string()),
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 SalaryError 转换
// ==========================================
impl From<SalaryError> for ApiError {
    fn from(err: SalaryError) -> Self {
        match err {
            SalaryError::MissingAssociation { .. } => ApiError::CalculationError(err.to_string()),
            SalaryError::Repository(inner) => ApiError::from(inner),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::MissingLink;

    #[test]
    fn test_not_found_message() {
        let err: ApiError = RepositoryError::not_found("Classroom", 9).into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "资源未找到: Classroom(id=9)不存在");
    }

    #[test]
    fn test_salary_error_conversion() {
        let err: ApiError = SalaryError::MissingAssociation {
            classroom_id: 4,
            missing: MissingLink::Teacher,
        }
        .into();
        assert!(matches!(err, ApiError::CalculationError(_)));

        let err: ApiError = SalaryError::Repository(RepositoryError::UniqueConstraintViolation(
            "UNIQUE".to_string(),
        ))
        .into();
        assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
    }
}
