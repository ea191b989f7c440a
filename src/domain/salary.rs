// ==========================================
// 教师课时薪酬系统 - 薪酬领域模型
// ==========================================
// 实体: SalaryConfig (学期薪酬配置) / TeacherSalary (班级薪酬记录)
// 约束: 每学期至多一个 SalaryConfig
// 约束: (teacher_id, classroom_id, salary_config_id) 唯一
// ==========================================

use crate::domain::types::{round_amount, round_coefficient, SalaryConfigStatus};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// SalaryConfig - 学期薪酬配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryConfig {
    pub id: i64,
    pub semester_id: i64,
    pub base_salary_per_lesson: Decimal, // 每课时基础薪酬 (≥ 0)
    pub status: SalaryConfigStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// SalaryResult - 单个班级的薪酬计算结果
// ==========================================
// 各系数均为计算时快照, 不随源数据变化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryResult {
    // ===== 关联键 =====
    pub teacher_id: i64,
    pub classroom_id: i64,
    pub salary_config_id: i64,

    // ===== 快照 =====
    pub actual_lessons: u32,
    pub class_coefficient: Decimal,
    pub course_coefficient: Decimal,
    pub teacher_coefficient: Decimal,

    // ===== 计算值 =====
    pub converted_lessons: Decimal,
    pub total_salary: Decimal,
}

impl SalaryResult {
    /// 按 teacher_salaries 表的列精度舍入
    ///
    /// 公式本身不做舍入, 仅在入库前调用; total_salary 已按未舍入的系数算出
    pub fn to_persisted_precision(&self) -> SalaryResult {
        SalaryResult {
            class_coefficient: round_coefficient(self.class_coefficient),
            course_coefficient: round_coefficient(self.course_coefficient),
            teacher_coefficient: round_coefficient(self.teacher_coefficient),
            converted_lessons: round_amount(self.converted_lessons),
            total_salary: round_amount(self.total_salary),
            ..self.clone()
        }
    }
}

// ==========================================
// TeacherSalary - 已入库的班级薪酬记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSalary {
    pub id: i64,
    pub teacher_id: i64,
    pub classroom_id: i64,
    pub salary_config_id: i64,
    pub actual_lessons: u32,
    pub class_coefficient: Decimal,
    pub course_coefficient: Decimal,
    pub teacher_coefficient: Decimal,
    pub converted_lessons: Decimal,
    pub total_salary: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// ClassroomFailure - 批量计算中单个班级的失败
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassroomFailure {
    pub classroom_id: i64,
    pub classroom_name: String,
    pub message: String,
}

// ==========================================
// SalaryPassResult - 一次批量计算的结果
// ==========================================
// 部分失败不影响其他班级, 失败明细随结果返回
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryPassResult {
    pub run_id: String,
    pub salary_config_id: i64,
    pub succeeded: Vec<SalaryResult>,
    pub failed: Vec<ClassroomFailure>,
    pub succeeded_count: usize,
    pub failed_count: usize,
}

impl SalaryPassResult {
    /// 面向操作人员的摘要信息
    pub fn summary_message(&self) -> String {
        let mut message = format!("薪酬计算完成: 已计算 {} 个班级", self.succeeded_count);
        if self.failed_count > 0 {
            message.push_str(&format!(", 失败 {} 个班级", self.failed_count));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_precision_rounds_snapshot_coefficients_to_one_place() {
        let result = SalaryResult {
            teacher_id: 1,
            classroom_id: 2,
            salary_config_id: 3,
            actual_lessons: 13,
            class_coefficient: Decimal::new(1, 1),
            course_coefficient: Decimal::new(13, 1),
            teacher_coefficient: Decimal::new(175, 2),
            converted_lessons: Decimal::new(182, 1),
            total_salary: Decimal::new(1_061_656_05, 2),
        };

        let persisted = result.to_persisted_precision();
        assert_eq!(persisted.teacher_coefficient, Decimal::new(18, 1));
        assert_eq!(persisted.teacher_coefficient.scale(), 1);
        assert_eq!(persisted.total_salary, Decimal::new(1_061_656_05, 2));
        assert_eq!(persisted.converted_lessons, Decimal::new(182, 1));
    }
}
