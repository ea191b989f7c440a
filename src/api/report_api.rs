// ==========================================
// 教师课时薪酬系统 - 学年报表 API
// ==========================================
// 职责: 教师/院系/全校 学年薪酬报表查询
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::PayrollConfigReader;
use crate::domain::report::{DepartmentReport, SchoolReport, TeacherYearlyReport};
use crate::engine::report::SalaryReportEngine;
use crate::engine::repositories::PayrollRepositories;
use crate::repository::AcademicRepository;

// ==========================================
// ReportApi - 学年报表 API
// ==========================================
pub struct ReportApi {
    academic_repo: Arc<AcademicRepository>,
    report_engine: SalaryReportEngine,
    config: Arc<dyn PayrollConfigReader>,
}

impl ReportApi {
    pub fn new(repos: &PayrollRepositories, config: Arc<dyn PayrollConfigReader>) -> Self {
        Self {
            academic_repo: repos.academic_repo.clone(),
            report_engine: SalaryReportEngine::new(repos.teacher_salary_repo.clone()),
            config,
        }
    }

    /// 教师学年报表
    pub fn teacher_yearly_report(
        &self,
        teacher_id: i64,
        academic_year_id: i64,
    ) -> ApiResult<TeacherYearlyReport> {
        if self.academic_repo.find_teacher(teacher_id)?.is_none() {
            return Err(ApiError::NotFound(format!("Teacher(id={})不存在", teacher_id)));
        }
        Ok(self
            .report_engine
            .teacher_yearly_report(teacher_id, academic_year_id)?)
    }

    /// 院系学年报表
    pub fn department_report(
        &self,
        department_id: i64,
        academic_year_id: i64,
    ) -> ApiResult<DepartmentReport> {
        if self.academic_repo.find_department(department_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Department(id={})不存在",
                department_id
            )));
        }
        Ok(self
            .report_engine
            .department_report(department_id, academic_year_id)?)
    }

    /// 全校学年报表, 每院系展示前 N 名教师 (report.top_teachers_per_department)
    pub fn school_report(&self, academic_year_id: i64) -> ApiResult<SchoolReport> {
        let top_teachers = self
            .config
            .get_top_teachers_per_department()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(self
            .report_engine
            .school_report(academic_year_id, top_teachers)?)
    }
}
