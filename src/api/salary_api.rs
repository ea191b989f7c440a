// ==========================================
// 教师课时薪酬系统 - 薪酬管理 API
// ==========================================
// 职责: 学期薪酬配置的创建/计算/关闭, 学期薪酬报表与导出
// 状态流转: draft -> active (计算后) -> closed
// 红线: closed 配置默认不可重算 (salary.allow_recalc_closed 可放开)
// ==========================================

use std::io::Write;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::PayrollConfigReader;
use crate::domain::report::{ReportTotals, SalaryReport};
use crate::domain::salary::{SalaryConfig, SalaryPassResult};
use crate::domain::types::SalaryConfigStatus;
use crate::engine::computation_pass::SalaryComputationPass;
use crate::engine::report::{filter_report_by_department, SalaryReportEngine};
use crate::engine::repositories::PayrollRepositories;
use crate::repository::{AcademicRepository, SalaryConfigRepository};

/// 一次计算的返回
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub config: SalaryConfig,
    pub pass: SalaryPassResult,
    pub message: String,
}

/// 学期薪酬报表 + 合计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryReportResponse {
    pub config: SalaryConfig,
    pub department_id: Option<i64>,
    pub report: SalaryReport,
    pub totals: ReportTotals,
}

/// CSV 导出行
#[derive(Debug, Serialize)]
struct SalaryCsvRow<'a> {
    teacher_id: i64,
    teacher_name: &'a str,
    department: &'a str,
    classroom_code: &'a str,
    classroom_name: &'a str,
    course_code: &'a str,
    course_name: &'a str,
    actual_lessons: u32,
    class_coefficient: Decimal,
    course_coefficient: Decimal,
    teacher_coefficient: Decimal,
    converted_lessons: Decimal,
    total_salary: Decimal,
}

// ==========================================
// SalaryApi - 薪酬管理 API
// ==========================================
pub struct SalaryApi {
    academic_repo: Arc<AcademicRepository>,
    salary_config_repo: Arc<SalaryConfigRepository>,
    pass: SalaryComputationPass,
    report_engine: SalaryReportEngine,
    config: Arc<dyn PayrollConfigReader>,
}

impl SalaryApi {
    pub fn new(repos: &PayrollRepositories, config: Arc<dyn PayrollConfigReader>) -> Self {
        Self {
            academic_repo: repos.academic_repo.clone(),
            salary_config_repo: repos.salary_config_repo.clone(),
            pass: SalaryComputationPass::from_repositories(repos),
            report_engine: SalaryReportEngine::new(repos.teacher_salary_repo.clone()),
            config,
        }
    }

    /// 创建学期薪酬配置 (初始状态 draft)
    ///
    /// # 错误
    /// - 每课时基础薪酬为负
    /// - 学期不存在
    /// - 该学期已有配置
    #[instrument(skip(self))]
    pub fn create_config(
        &self,
        semester_id: i64,
        base_salary_per_lesson: Decimal,
    ) -> ApiResult<SalaryConfig> {
        if base_salary_per_lesson < Decimal::ZERO {
            return Err(ApiError::InvalidInput(format!(
                "每课时基础薪酬不能为负: {}",
                base_salary_per_lesson
            )));
        }
        if self.academic_repo.find_semester(semester_id)?.is_none() {
            return Err(ApiError::NotFound(format!("Semester(id={})不存在", semester_id)));
        }
        if self.salary_config_repo.find_by_semester(semester_id)?.is_some() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "学期(id={})已存在薪酬配置",
                semester_id
            )));
        }

        let config = self.salary_config_repo.insert(
            semester_id,
            base_salary_per_lesson,
            SalaryConfigStatus::Draft,
        )?;
        info!(salary_config_id = config.id, "薪酬配置已创建");
        Ok(config)
    }

    /// 查询全部配置 (最新在前)
    pub fn list_configs(&self) -> ApiResult<Vec<SalaryConfig>> {
        Ok(self.salary_config_repo.list_all()?)
    }

    /// 计算薪酬并将配置置为 active
    #[instrument(skip(self))]
    pub fn calculate(&self, salary_config_id: i64) -> ApiResult<CalculationOutcome> {
        let config = self.load_config(salary_config_id)?;

        if config.status == SalaryConfigStatus::Closed {
            let allow = self
                .config
                .allow_recalc_closed()
                .map_err(|e| ApiError::ConfigError(e.to_string()))?;
            if !allow {
                return Err(ApiError::InvalidStateTransition {
                    from: config.status.to_db_str().to_string(),
                    to: SalaryConfigStatus::Active.to_db_str().to_string(),
                });
            }
            warn!("按配置放开, 重新计算已关闭的薪酬配置");
        }

        let scope = self
            .config
            .get_classroom_scope()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let pass = self.pass.run(&config, scope)?;

        self.salary_config_repo
            .update_status(config.id, SalaryConfigStatus::Active)?;
        let config = self.load_config(salary_config_id)?;

        let message = pass.summary_message();
        info!(
            run_id = %pass.run_id,
            succeeded = pass.succeeded_count,
            failed = pass.failed_count,
            "{}",
            message
        );

        Ok(CalculationOutcome {
            config,
            pass,
            message,
        })
    }

    /// 关闭配置
    #[instrument(skip(self))]
    pub fn close(&self, salary_config_id: i64) -> ApiResult<SalaryConfig> {
        let config = self.load_config(salary_config_id)?;
        if config.status == SalaryConfigStatus::Closed {
            return Ok(config);
        }

        self.salary_config_repo
            .update_status(config.id, SalaryConfigStatus::Closed)?;
        info!(from = %config.status, "薪酬配置已关闭");
        self.load_config(salary_config_id)
    }

    /// 学期薪酬报表
    ///
    /// # 参数
    /// - `department_id`: Some 时仅包含该院系教师 (院系负责人视图)
    #[instrument(skip(self))]
    pub fn report(
        &self,
        salary_config_id: i64,
        department_id: Option<i64>,
    ) -> ApiResult<SalaryReportResponse> {
        let config = self.load_config(salary_config_id)?;
        let mut report = self.report_engine.build_salary_report(config.id)?;
        if let Some(department_id) = department_id {
            report = filter_report_by_department(report, department_id);
        }
        let totals = ReportTotals::from_report(&report);

        Ok(SalaryReportResponse {
            config,
            department_id,
            report,
            totals,
        })
    }

    /// 导出学期薪酬明细为 CSV
    ///
    /// # 返回
    /// 写出的数据行数 (不含表头)
    #[instrument(skip(self, writer))]
    pub fn export_report_csv<W: Write>(
        &self,
        salary_config_id: i64,
        department_id: Option<i64>,
        writer: W,
    ) -> ApiResult<usize> {
        let response = self.report(salary_config_id, department_id)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut rows = 0;
        for summary in response.report.values() {
            for class in &summary.classes {
                csv_writer
                    .serialize(SalaryCsvRow {
                        teacher_id: summary.teacher.id,
                        teacher_name: &summary.teacher.full_name,
                        department: summary.teacher.department_name.as_deref().unwrap_or(""),
                        classroom_code: &class.classroom_code,
                        classroom_name: &class.classroom_name,
                        course_code: class.course_code.as_deref().unwrap_or(""),
                        course_name: class.course_name.as_deref().unwrap_or(""),
                        actual_lessons: class.salary.actual_lessons,
                        class_coefficient: class.salary.class_coefficient,
                        course_coefficient: class.salary.course_coefficient,
                        teacher_coefficient: class.salary.teacher_coefficient,
                        converted_lessons: class.salary.converted_lessons,
                        total_salary: class.salary.total_salary,
                    })
                    .map_err(|e| ApiError::ExportError(e.to_string()))?;
                rows += 1;
            }
        }
        csv_writer
            .flush()
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        info!(rows, "薪酬明细已导出");
        Ok(rows)
    }

    fn load_config(&self, salary_config_id: i64) -> ApiResult<SalaryConfig> {
        self.salary_config_repo
            .find_by_id(salary_config_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("SalaryConfig(id={})不存在", salary_config_id))
            })
    }
}
