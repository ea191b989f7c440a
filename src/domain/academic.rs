// ==========================================
// 教师课时薪酬系统 - 教学管理领域模型
// ==========================================
// 实体: 院系 / 学位 / 教师 / 课程 / 学年 / 学期 / 班级
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// Department - 院系
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub abbr_name: Option<String>, // 简称
    pub description: Option<String>,
}

// ==========================================
// Degree - 学位
// ==========================================
// base_salary_factor 即教师系数, 取值 0.1 - 5.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degree {
    pub id: i64,
    pub name: String,
    pub base_salary_factor: Decimal,
}

impl Degree {
    /// 学位系数允许范围 [0.1, 5.0]
    pub fn factor_range() -> (Decimal, Decimal) {
        (Decimal::new(1, 1), Decimal::new(50, 1))
    }
}

// ==========================================
// Teacher - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub degree_id: Option<i64>,
    pub department_id: Option<i64>,
}

// ==========================================
// Course - 课程
// ==========================================
// lessons: 标准课时 (1 - 100)
// course_coefficient: 课程系数 (1.0 - 1.5)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub lessons: u32,
    pub course_coefficient: Decimal,
    pub department_id: Option<i64>,
}

impl Course {
    pub const MAX_LESSONS: u32 = 100;

    /// 课程系数允许范围 [1.0, 1.5]
    pub fn coefficient_range() -> (Decimal, Decimal) {
        (Decimal::ONE, Decimal::new(15, 1))
    }
}

// ==========================================
// AcademicYear / Semester - 学年 / 学期
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: i64,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: i64,
    pub name: String,
    pub academic_year_id: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ==========================================
// Classroom - 班级
// ==========================================
// class_coefficient 是 students 的派生值, 在设置人数时显式刷新
// teacher_id 为空的班级不参与薪酬计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub semester_id: i64,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub students: u32,
    pub class_coefficient: Decimal,
}

// ==========================================
// ClassroomContext - 班级及其关联
// ==========================================
// 薪酬公式的输入: 班级 + 教师(含学位) + 课程
// 关联缺失以 None 表示, 由公式判定是否可计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassroomContext {
    pub classroom: Classroom,
    pub teacher: Option<Teacher>,
    pub degree: Option<Degree>,
    pub course: Option<Course>,
}

// ==========================================
// 新建实体输入 (id/code 由仓储生成)
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeacher {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub degree_id: Option<i64>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub code: Option<String>, // 为空时自动生成 CSxxx
    pub name: String,
    pub credits: u32,
    pub lessons: u32,
    pub course_coefficient: Option<Decimal>, // 为空时取 1.0
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassroom {
    pub code: Option<String>, // 为空时自动生成 LHxxx
    pub name: String,
    pub semester_id: i64,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub students: u32,
}
