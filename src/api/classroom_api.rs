// ==========================================
// 教师课时薪酬系统 - 班级管理 API
// ==========================================
// 职责: 班级新增/批量新增、人数与教师变更、班级系数回填
// 红线: 人数变化时显式重算并写入 class_coefficient
// 红线: 学期薪酬已计算 (active) 或已关闭 (closed) 时班级数据锁定
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::PayrollConfigReader;
use crate::domain::academic::{Classroom, NewClassroom};
use crate::engine::coefficient::compute_class_coefficient;
use crate::engine::repositories::PayrollRepositories;
use crate::repository::{ClassroomRepository, RepositoryError, SalaryConfigRepository};

/// 批量新增的班级数上限
pub const MAX_BULK_CLASSROOMS: u32 = 20;

/// 批量新增班级请求
///
/// 班级名称为 "{prefix} N01" ... "{prefix} N{count}"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkClassroomRequest {
    pub semester_id: i64,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub prefix: String,
    pub count: u32,
    pub students_per_class: u32,
}

// ==========================================
// ClassroomApi - 班级管理 API
// ==========================================
pub struct ClassroomApi {
    classroom_repo: Arc<ClassroomRepository>,
    salary_config_repo: Arc<SalaryConfigRepository>,
    config: Arc<dyn PayrollConfigReader>,
}

impl ClassroomApi {
    pub fn new(repos: &PayrollRepositories, config: Arc<dyn PayrollConfigReader>) -> Self {
        Self {
            classroom_repo: repos.classroom_repo.clone(),
            salary_config_repo: repos.salary_config_repo.clone(),
            config,
        }
    }

    /// 新增班级
    #[instrument(skip(self, input), fields(semester_id = input.semester_id))]
    pub fn create_classroom(&self, input: NewClassroom) -> ApiResult<Classroom> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("班级名称不能为空".to_string()));
        }
        self.validate_students(input.students)?;
        self.ensure_semester_unlocked(input.semester_id)?;

        if self
            .classroom_repo
            .exists_by_name(input.semester_id, input.course_id, name)?
        {
            return Err(ApiError::BusinessRuleViolation(format!(
                "同一学期同一课程下已存在班级: {}",
                name
            )));
        }

        let input = NewClassroom {
            name: name.to_string(),
            ..input
        };
        let classroom = self
            .classroom_repo
            .insert(&input, compute_class_coefficient(input.students))?;

        info!(
            classroom_id = classroom.id,
            code = %classroom.code,
            class_coefficient = %classroom.class_coefficient,
            "班级已创建"
        );
        Ok(classroom)
    }

    /// 批量新增班级
    ///
    /// 任一名称重复时整批拒绝, 不写入任何班级
    #[instrument(skip(self, request), fields(semester_id = request.semester_id, count = request.count))]
    pub fn bulk_create_classrooms(
        &self,
        request: &BulkClassroomRequest,
    ) -> ApiResult<Vec<Classroom>> {
        let prefix = request.prefix.trim();
        if prefix.is_empty() {
            return Err(ApiError::InvalidInput("班级名称前缀不能为空".to_string()));
        }
        if request.count == 0 || request.count > MAX_BULK_CLASSROOMS {
            return Err(ApiError::InvalidInput(format!(
                "班级数量必须在 1-{} 之间, 实际 {}",
                MAX_BULK_CLASSROOMS, request.count
            )));
        }
        if request.students_per_class == 0 {
            return Err(ApiError::InvalidInput("每班人数必须大于 0".to_string()));
        }
        self.validate_students(request.students_per_class)?;
        self.ensure_semester_unlocked(request.semester_id)?;

        let names: Vec<String> = (1..=request.count)
            .map(|n| format!("{} N{:02}", prefix, n))
            .collect();

        let duplicates = names
            .iter()
            .map(|name| {
                self.classroom_repo
                    .exists_by_name(request.semester_id, request.course_id, name)
                    .map(|exists| exists.then(|| name.clone()))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        if !duplicates.is_empty() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "以下班级已存在: {}",
                duplicates.join(", ")
            )));
        }

        let class_coefficient = compute_class_coefficient(request.students_per_class);
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            let input = NewClassroom {
                code: None,
                name,
                semester_id: request.semester_id,
                course_id: request.course_id,
                teacher_id: request.teacher_id,
                students: request.students_per_class,
            };
            created.push(self.classroom_repo.insert(&input, class_coefficient)?);
        }

        info!(created = created.len(), "批量创建班级完成");
        Ok(created)
    }

    /// 修改班级人数, 同时重算班级系数
    #[instrument(skip(self))]
    pub fn update_students(&self, classroom_id: i64, students: u32) -> ApiResult<Classroom> {
        self.validate_students(students)?;
        let classroom = self.load_classroom(classroom_id)?;
        self.ensure_semester_unlocked(classroom.semester_id)?;

        let class_coefficient = compute_class_coefficient(students);
        self.classroom_repo
            .update_enrollment(classroom_id, students, class_coefficient)?;

        info!(students, class_coefficient = %class_coefficient, "班级人数已更新");
        Ok(Classroom {
            students,
            class_coefficient,
            ..classroom
        })
    }

    /// 分配或取消分配教师
    #[instrument(skip(self))]
    pub fn assign_teacher(&self, classroom_id: i64, teacher_id: Option<i64>) -> ApiResult<Classroom> {
        let classroom = self.load_classroom(classroom_id)?;
        self.ensure_semester_unlocked(classroom.semester_id)?;

        self.classroom_repo.update_teacher(classroom_id, teacher_id)?;
        info!("班级教师已更新");
        Ok(Classroom {
            teacher_id,
            ..classroom
        })
    }

    /// 按当前人数回填所有班级的系数
    ///
    /// # 返回
    /// 实际发生变化的班级数
    #[instrument(skip(self))]
    pub fn refresh_all_coefficients(&self) -> ApiResult<usize> {
        let mut updated = 0;
        for classroom in self.classroom_repo.list_all()? {
            let expected = compute_class_coefficient(classroom.students);
            if classroom.class_coefficient != expected {
                self.classroom_repo
                    .update_enrollment(classroom.id, classroom.students, expected)?;
                updated += 1;
            }
        }
        info!(updated, "班级系数回填完成");
        Ok(updated)
    }

    // ==========================================
    // 内部校验
    // ==========================================

    fn load_classroom(&self, classroom_id: i64) -> ApiResult<Classroom> {
        self.classroom_repo
            .find_by_id(classroom_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Classroom(id={})不存在", classroom_id)))
    }

    fn validate_students(&self, students: u32) -> ApiResult<()> {
        let max_students = self
            .config
            .get_max_students()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        if students > max_students {
            return Err(ApiError::InvalidInput(format!(
                "班级人数必须在 0-{} 之间, 实际 {}",
                max_students, students
            )));
        }
        Ok(())
    }

    fn ensure_semester_unlocked(&self, semester_id: i64) -> ApiResult<()> {
        if let Some(config) = self.salary_config_repo.find_by_semester(semester_id)? {
            if config.status.locks_semester() {
                return Err(ApiError::SemesterLocked {
                    semester_id,
                    status: config.status.label().to_string(),
                });
            }
        }
        Ok(())
    }
}
