// ==========================================
// 教师课时薪酬系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use std::fmt;
use thiserror::Error;

/// 班级计算所需但缺失的关联
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingLink {
    Teacher, // 未分配教师
    Course,  // 未关联课程
    Degree,  // 教师未设置学位, 无法确定教师系数
}

impl fmt::Display for MissingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MissingLink::Teacher => "教师",
            MissingLink::Course => "课程",
            MissingLink::Degree => "教师学位",
        };
        write!(f, "{}", text)
    }
}

/// 薪酬引擎错误类型
#[derive(Error, Debug)]
pub enum SalaryError {
    /// 单个班级的关联缺失, 批量计算中记为失败后继续
    #[error("班级缺少{missing} (classroom_id={classroom_id})")]
    MissingAssociation {
        classroom_id: i64,
        missing: MissingLink,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_association_message_names_link() {
        let err = SalaryError::MissingAssociation {
            classroom_id: 7,
            missing: MissingLink::Course,
        };
        assert_eq!(err.to_string(), "班级缺少课程 (classroom_id=7)");
    }
}
