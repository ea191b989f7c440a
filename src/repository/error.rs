// ==========================================
// 教师课时薪酬系统 - 仓储层错误类型
// ==========================================
// SQLite 约束失败按类型区分, 供 API 层转换为业务提示
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("记录未找到: {entity}(id={id})")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    /// 引用的院系/学位/学期等不存在
    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    /// 如 students < 0、未知的配置状态
    #[error("取值约束违反: {0}")]
    CheckConstraintViolation(String),

    /// 已入库的列无法解析 (如十进制 TEXT 列内容损坏)
    #[error("列值无法解析 (column#{column}): {message}")]
    MalformedColumn { column: usize, message: String },

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("FOREIGN KEY") => {
                RepositoryError::ForeignKeyViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("CHECK") => {
                RepositoryError::CheckConstraintViolation(msg)
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::not_found("记录", "?"),
            rusqlite::Error::FromSqlConversionFailure(column, _, cause) => {
                RepositoryError::MalformedColumn {
                    column,
                    message: cause.to_string(),
                }
            }
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
