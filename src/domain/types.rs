// ==========================================
// 教师课时薪酬系统 - 领域类型定义
// ==========================================
// 职责: 枚举类型、小数精度约定
// 存储: 枚举以 SCREAMING_SNAKE_CASE / 小写字符串入库
// ==========================================

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 小数精度约定
// ==========================================
// 对齐 teacher_salaries 表:
// - class_coefficient / course_coefficient / teacher_coefficient: 1 位小数
// - converted_lessons / total_salary: 2 位小数
// 学位表的 base_salary_factor 保留 2 位小数, 仅在快照入库时舍入到 1 位

/// 薪酬快照中各系数保留位数
pub const COEFFICIENT_SCALE: u32 = 1;

/// 学位系数 (base_salary_factor) 保留位数
pub const FACTOR_SCALE: u32 = 2;

/// 折算课时、金额保留位数
pub const AMOUNT_SCALE: u32 = 2;

/// 按入库精度舍入系数 (四舍五入, 远离零)
pub fn round_coefficient(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(COEFFICIENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// 按学位表精度舍入学位系数
pub fn round_factor(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(FACTOR_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// 按入库精度舍入金额/课时
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// ==========================================
// 薪酬配置状态 (Salary Config Status)
// ==========================================
// 流转: draft -> active (已计算) -> closed (已关闭)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryConfigStatus {
    Draft,  // 草稿
    Active, // 已计算
    Closed, // 已关闭
}

impl fmt::Display for SalaryConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl SalaryConfigStatus {
    /// 从数据库字符串解析
    ///
    /// 未知值返回 None, 由调用方决定如何报错
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(SalaryConfigStatus::Draft),
            "active" => Some(SalaryConfigStatus::Active),
            "closed" => Some(SalaryConfigStatus::Closed),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SalaryConfigStatus::Draft => "draft",
            SalaryConfigStatus::Active => "active",
            SalaryConfigStatus::Closed => "closed",
        }
    }

    /// 报表展示用中文标签
    pub fn label(&self) -> &'static str {
        match self {
            SalaryConfigStatus::Draft => "草稿",
            SalaryConfigStatus::Active => "已计算",
            SalaryConfigStatus::Closed => "已关闭",
        }
    }

    /// 该状态下所属学期的班级数据是否已锁定
    pub fn locks_semester(&self) -> bool {
        matches!(self, SalaryConfigStatus::Active | SalaryConfigStatus::Closed)
    }
}

// ==========================================
// 薪酬计算的班级范围 (Classroom Scope)
// ==========================================
// AllAssigned: 所有已分配教师的班级 (不区分学期)
// ConfigSemester: 仅限薪酬配置所属学期的班级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassroomScope {
    AllAssigned,
    ConfigSemester,
}

impl Default for ClassroomScope {
    fn default() -> Self {
        ClassroomScope::AllAssigned
    }
}

impl fmt::Display for ClassroomScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl ClassroomScope {
    /// 从配置字符串解析
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ALL_ASSIGNED" => Some(ClassroomScope::AllAssigned),
            "CONFIG_SEMESTER" => Some(ClassroomScope::ConfigSemester),
            _ => None,
        }
    }

    /// 转换为配置存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ClassroomScope::AllAssigned => "ALL_ASSIGNED",
            ClassroomScope::ConfigSemester => "CONFIG_SEMESTER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_db_str() {
        for status in [
            SalaryConfigStatus::Draft,
            SalaryConfigStatus::Active,
            SalaryConfigStatus::Closed,
        ] {
            assert_eq!(SalaryConfigStatus::from_db_str(status.to_db_str()), Some(status));
        }
        assert_eq!(SalaryConfigStatus::from_db_str("ACTIVE"), Some(SalaryConfigStatus::Active));
        assert_eq!(SalaryConfigStatus::from_db_str("archived"), None);
    }

    #[test]
    fn test_semester_lock_only_after_calculation() {
        assert!(!SalaryConfigStatus::Draft.locks_semester());
        assert!(SalaryConfigStatus::Active.locks_semester());
        assert!(SalaryConfigStatus::Closed.locks_semester());
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round_amount(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_amount(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
        assert_eq!(round_coefficient(Decimal::new(125, 2)), Decimal::new(13, 1));
        assert_eq!(round_factor(Decimal::new(2345, 3)), Decimal::new(235, 2));
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!(ClassroomScope::from_config_str("all_assigned"), Some(ClassroomScope::AllAssigned));
        assert_eq!(
            ClassroomScope::from_config_str(" CONFIG_SEMESTER "),
            Some(ClassroomScope::ConfigSemester)
        );
        assert_eq!(ClassroomScope::from_config_str("semester"), None);
        assert_eq!(ClassroomScope::default(), ClassroomScope::AllAssigned);
    }
}
