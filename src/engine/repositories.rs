// ==========================================
// 教师课时薪酬系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合薪酬引擎所需的所有 Repository
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    AcademicRepository, ClassroomRepository, SalaryConfigRepository, TeacherSalaryRepository,
};

/// 薪酬引擎仓储集合
///
/// # 包含的仓储
/// - `academic_repo`: 院系/学位/教师/课程/学期
/// - `classroom_repo`: 班级
/// - `salary_config_repo`: 学期薪酬配置
/// - `teacher_salary_repo`: 班级薪酬记录
#[derive(Clone)]
pub struct PayrollRepositories {
    pub academic_repo: Arc<AcademicRepository>,
    pub classroom_repo: Arc<ClassroomRepository>,
    pub salary_config_repo: Arc<SalaryConfigRepository>,
    pub teacher_salary_repo: Arc<TeacherSalaryRepository>,
}

impl PayrollRepositories {
    /// 基于同一连接创建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            academic_repo: Arc::new(AcademicRepository::new(conn.clone())),
            classroom_repo: Arc::new(ClassroomRepository::new(conn.clone())),
            salary_config_repo: Arc::new(SalaryConfigRepository::new(conn.clone())),
            teacher_salary_repo: Arc::new(TeacherSalaryRepository::new(conn)),
        }
    }
}
