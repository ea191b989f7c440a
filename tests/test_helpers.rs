// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、基础数据生成等功能
// ==========================================
#![allow(dead_code)]

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use teaching_payroll::db::{ensure_schema, open_sqlite_connection};
use teaching_payroll::domain::academic::{
    Classroom, Course, Degree, Department, NewClassroom, NewCourse, NewTeacher, Semester, Teacher,
};
use teaching_payroll::engine::compute_class_coefficient;
use teaching_payroll::engine::PayrollRepositories;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库并创建仓储集合
pub fn open_repos(db_path: &str) -> (Arc<Mutex<Connection>>, PayrollRepositories) {
    let conn = Arc::new(Mutex::new(
        open_sqlite_connection(db_path).expect("Failed to open test db"),
    ));
    let repos = PayrollRepositories::from_connection(conn.clone());
    (conn, repos)
}

/// 一位小数
pub fn dec1(tenths: i64) -> Decimal {
    Decimal::new(tenths, 1)
}

// ==========================================
// 基础数据
// ==========================================

/// 一个学年、两个学期、两个院系
pub struct Campus {
    pub academic_year_id: i64,
    pub semester_1: Semester,
    pub semester_2: Semester,
    pub dept_it: Department,
    pub dept_math: Department,
}

pub fn seed_campus(repos: &PayrollRepositories) -> Campus {
    let academic = &repos.academic_repo;
    let year = academic
        .insert_academic_year("2025-2026", None, None)
        .expect("Failed to insert academic year");
    let semester_1 = academic
        .insert_semester("HK1 2025-2026", year.id, None, None)
        .expect("Failed to insert semester");
    let semester_2 = academic
        .insert_semester("HK2 2025-2026", year.id, None, None)
        .expect("Failed to insert semester");
    let dept_it = academic
        .insert_department("信息学院", Some("IT"), None)
        .expect("Failed to insert department");
    let dept_math = academic
        .insert_department("数学学院", Some("MATH"), None)
        .expect("Failed to insert department");

    Campus {
        academic_year_id: year.id,
        semester_1,
        semester_2,
        dept_it,
        dept_math,
    }
}

pub fn insert_degree(repos: &PayrollRepositories, name: &str, factor: Decimal) -> Degree {
    repos
        .academic_repo
        .insert_degree(name, factor)
        .expect("Failed to insert degree")
}

pub fn insert_teacher(
    repos: &PayrollRepositories,
    name: &str,
    degree_id: Option<i64>,
    department_id: Option<i64>,
) -> Teacher {
    repos
        .academic_repo
        .insert_teacher(&NewTeacher {
            full_name: name.to_string(),
            date_of_birth: None,
            phone: None,
            email: Some(format!("{}@example.edu", name)),
            degree_id,
            department_id,
        })
        .expect("Failed to insert teacher")
}

pub fn insert_course(
    repos: &PayrollRepositories,
    name: &str,
    lessons: u32,
    coefficient: Decimal,
) -> Course {
    repos
        .academic_repo
        .insert_course(&NewCourse {
            code: None,
            name: name.to_string(),
            credits: 3,
            lessons,
            course_coefficient: Some(coefficient),
            department_id: None,
        })
        .expect("Failed to insert course")
}

/// 直接经仓储写入班级 (绕过 API 的学期锁与校验)
pub fn insert_classroom(
    repos: &PayrollRepositories,
    name: &str,
    semester_id: i64,
    course_id: Option<i64>,
    teacher_id: Option<i64>,
    students: u32,
) -> Classroom {
    repos
        .classroom_repo
        .insert(
            &NewClassroom {
                code: None,
                name: name.to_string(),
                semester_id,
                course_id,
                teacher_id,
                students,
            },
            compute_class_coefficient(students),
        )
        .expect("Failed to insert classroom")
}
