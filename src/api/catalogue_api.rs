// ==========================================
// 教师课时薪酬系统 - 基础数据 API
// ==========================================
// 职责: 学位/课程/教师的新增与系数维护
// 红线: 学位系数 [0.1, 5.0] 且各学位互不相同, 课程系数 [1.0, 1.5], 课时 1-100
// 区间按输入原值校验, 通过后再舍入到入库精度
// 系数修改不影响已入库的薪酬快照, 重新计算后才生效
// ==========================================

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::academic::{Course, Degree, NewCourse, NewTeacher, Teacher};
use crate::domain::types::{round_coefficient, round_factor};
use crate::engine::repositories::PayrollRepositories;
use crate::repository::AcademicRepository;

// ==========================================
// CatalogueApi - 基础数据 API
// ==========================================
pub struct CatalogueApi {
    academic_repo: Arc<AcademicRepository>,
}

impl CatalogueApi {
    pub fn new(repos: &PayrollRepositories) -> Self {
        Self {
            academic_repo: repos.academic_repo.clone(),
        }
    }

    /// 新增学位
    #[instrument(skip(self))]
    pub fn create_degree(&self, name: &str, base_salary_factor: Decimal) -> ApiResult<Degree> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("学位名称不能为空".to_string()));
        }
        let factor = validate_degree_factor(base_salary_factor)?;
        self.ensure_factor_unused(factor, None)?;
        let degree = self.academic_repo.insert_degree(name, factor)?;
        info!(degree_id = degree.id, "学位已创建");
        Ok(degree)
    }

    /// 修改学位系数
    #[instrument(skip(self))]
    pub fn update_degree_factor(&self, degree_id: i64, base_salary_factor: Decimal) -> ApiResult<Degree> {
        let factor = validate_degree_factor(base_salary_factor)?;
        if self.academic_repo.find_degree(degree_id)?.is_none() {
            return Err(ApiError::NotFound(format!("Degree(id={})不存在", degree_id)));
        }
        self.ensure_factor_unused(factor, Some(degree_id))?;
        self.academic_repo.update_degree_factor(degree_id, factor)?;
        self.academic_repo
            .find_degree(degree_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Degree(id={})不存在", degree_id)))
    }

    /// 学位系数不得与其他学位重复 (按数值比较, 1.5 与 1.50 视为相同)
    fn ensure_factor_unused(&self, factor: Decimal, current_id: Option<i64>) -> ApiResult<()> {
        let taken = self
            .academic_repo
            .list_degrees()?
            .into_iter()
            .find(|d| Some(d.id) != current_id && d.base_salary_factor == factor);
        match taken {
            Some(degree) => Err(ApiError::BusinessRuleViolation(format!(
                "学位系数 {} 已被学位 {} 使用",
                factor, degree.name
            ))),
            None => Ok(()),
        }
    }

    /// 新增课程
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn create_course(&self, input: NewCourse) -> ApiResult<Course> {
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("课程名称不能为空".to_string()));
        }
        if input.lessons == 0 || input.lessons > Course::MAX_LESSONS {
            return Err(ApiError::InvalidInput(format!(
                "课时必须在 1-{} 之间, 实际 {}",
                Course::MAX_LESSONS,
                input.lessons
            )));
        }
        let course_coefficient = input
            .course_coefficient
            .map(validate_course_coefficient)
            .transpose()?;

        let course = self.academic_repo.insert_course(&NewCourse {
            name: input.name.trim().to_string(),
            course_coefficient,
            ..input
        })?;
        info!(course_id = course.id, code = %course.code, "课程已创建");
        Ok(course)
    }

    /// 修改课程系数
    #[instrument(skip(self))]
    pub fn update_course_coefficient(&self, course_id: i64, coefficient: Decimal) -> ApiResult<Course> {
        let coefficient = validate_course_coefficient(coefficient)?;
        self.academic_repo
            .update_course_coefficient(course_id, coefficient)?;
        self.academic_repo
            .find_course(course_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Course(id={})不存在", course_id)))
    }

    /// 新增教师
    ///
    /// 学位、院系可为空; 无学位的教师所带班级在计算时记为失败
    #[instrument(skip(self, input), fields(full_name = %input.full_name))]
    pub fn create_teacher(&self, input: NewTeacher) -> ApiResult<Teacher> {
        if input.full_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("教师姓名不能为空".to_string()));
        }
        if let Some(degree_id) = input.degree_id {
            if self.academic_repo.find_degree(degree_id)?.is_none() {
                return Err(ApiError::NotFound(format!("Degree(id={})不存在", degree_id)));
            }
        }
        if let Some(department_id) = input.department_id {
            if self.academic_repo.find_department(department_id)?.is_none() {
                return Err(ApiError::NotFound(format!(
                    "Department(id={})不存在",
                    department_id
                )));
            }
        }

        let teacher = self.academic_repo.insert_teacher(&NewTeacher {
            full_name: input.full_name.trim().to_string(),
            ..input
        })?;
        info!(teacher_id = teacher.id, "教师已创建");
        Ok(teacher)
    }
}

/// 按原值校验区间, 再舍入到学位表精度
fn validate_degree_factor(value: Decimal) -> ApiResult<Decimal> {
    let (min, max) = Degree::factor_range();
    if value < min || value > max {
        return Err(ApiError::InvalidInput(format!(
            "学位系数必须在 {}-{} 之间, 实际 {}",
            min, max, value
        )));
    }
    Ok(round_factor(value))
}

/// 按原值校验区间, 再舍入到课程表精度
fn validate_course_coefficient(value: Decimal) -> ApiResult<Decimal> {
    let (min, max) = Course::coefficient_range();
    if value < min || value > max {
        return Err(ApiError::InvalidInput(format!(
            "课程系数必须在 {}-{} 之间, 实际 {}",
            min, max, value
        )));
    }
    Ok(round_coefficient(value))
}
