// ==========================================
// 教师课时薪酬系统 - 报表领域模型
// ==========================================
// 学期薪酬报表: 按教师分组的班级薪酬明细与合计
// 学年报表: 教师 / 院系 / 全校 三个口径
// ==========================================

use crate::domain::salary::TeacherSalary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// TeacherProfile - 报表中的教师信息 (含院系)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
}

// ==========================================
// SalaryRecordView - 薪酬记录 + 班级/课程/学期展示信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecordView {
    pub salary: TeacherSalary,
    pub teacher: TeacherProfile,
    pub classroom_code: String,
    pub classroom_name: String,
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub semester_id: i64,
    pub semester_name: String,
    pub academic_year_id: i64,
}

// ==========================================
// 学期薪酬报表
// ==========================================

/// 单个教师的学期薪酬汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSalarySummary {
    pub teacher: TeacherProfile,
    pub classes: Vec<SalaryRecordView>,
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
}

/// teacher_id -> 汇总
pub type SalaryReport = BTreeMap<i64, TeacherSalarySummary>;

/// 报表合计 (全校或院系口径)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub total_teachers: usize,
    pub total_classes: usize,
    pub total_lessons: Decimal,
    pub total_salary: Decimal,
}

impl ReportTotals {
    /// 对报表中每位教师的汇总求和
    pub fn from_report(report: &SalaryReport) -> Self {
        report.values().fold(ReportTotals::default(), |acc, summary| ReportTotals {
            total_teachers: acc.total_teachers + 1,
            total_classes: acc.total_classes + summary.total_classes,
            total_lessons: acc.total_lessons + summary.total_lessons,
            total_salary: acc.total_salary + summary.total_salary,
        })
    }
}

// ==========================================
// 学年报表
// ==========================================

/// 薪酬合计 + 平均每班薪酬
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalarySummary {
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
    pub average_salary_per_class: Decimal,
}

/// 单学期小计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterBreakdown {
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
}

/// 教师学年报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherYearlyReport {
    pub teacher_id: i64,
    pub academic_year_id: i64,
    /// 学期名称 -> 班级薪酬明细
    pub by_semester: BTreeMap<String, Vec<SalaryRecordView>>,
    pub summary: SalarySummary,
}

/// 院系报表中的教师行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentTeacherRow {
    pub teacher: TeacherProfile,
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
    pub by_semester: BTreeMap<String, SemesterBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentTotals {
    pub total_teachers: usize,
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
    pub average_salary_per_teacher: Decimal,
}

/// 院系学年报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentReport {
    pub department_id: i64,
    pub academic_year_id: i64,
    /// 按总薪酬降序
    pub teachers: Vec<DepartmentTeacherRow>,
    pub totals: DepartmentTotals,
}

/// 全校报表中的教师简要行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherTotalsRow {
    pub teacher: TeacherProfile,
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
}

/// 全校报表中的院系行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolDepartmentRow {
    pub department_id: i64,
    pub department_name: String,
    pub teachers_count: usize,
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
    pub top_teachers: Vec<TeacherTotalsRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolTotals {
    pub total_departments: usize,
    pub total_teachers: usize,
    pub total_salary: Decimal,
    pub total_classes: usize,
    pub total_lessons: Decimal,
    pub average_salary_per_teacher: Decimal,
    pub average_salary_per_department: Decimal,
}

/// 全校学年报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolReport {
    pub academic_year_id: i64,
    /// 按总薪酬降序
    pub departments: Vec<SchoolDepartmentRow>,
    pub totals: SchoolTotals,
}
