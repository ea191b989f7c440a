// ==========================================
// 教师课时薪酬系统 - 批量薪酬计算
// ==========================================
// 职责: 对已分配教师的班级逐个套用薪酬公式, upsert 计算结果
// 输入: SalaryConfig + ClassroomScope
// 输出: SalaryPassResult (成功结果 + 失败明细)
// ==========================================
// 红线: 单个班级关联缺失只记为失败, 不中断整批
// 红线: 写入按 (teacher_id, classroom_id, salary_config_id) upsert, 可反复重跑
// 持久化错误直接上抛, 已写入的记录保留
// ==========================================

use crate::domain::salary::{ClassroomFailure, SalaryConfig, SalaryPassResult};
use crate::domain::types::ClassroomScope;
use crate::engine::repositories::PayrollRepositories;
use crate::engine::salary_formula::compute_salary_for_classroom;
use crate::repository::error::RepositoryResult;
use crate::repository::{ClassroomRepository, TeacherSalaryRepository};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// SalaryComputationPass - 批量薪酬计算
// ==========================================
pub struct SalaryComputationPass {
    classroom_repo: Arc<ClassroomRepository>,
    teacher_salary_repo: Arc<TeacherSalaryRepository>,
}

impl SalaryComputationPass {
    pub fn new(
        classroom_repo: Arc<ClassroomRepository>,
        teacher_salary_repo: Arc<TeacherSalaryRepository>,
    ) -> Self {
        Self {
            classroom_repo,
            teacher_salary_repo,
        }
    }

    pub fn from_repositories(repos: &PayrollRepositories) -> Self {
        Self::new(repos.classroom_repo.clone(), repos.teacher_salary_repo.clone())
    }

    /// 执行一次批量计算
    ///
    /// # 参数
    /// - `config`: 薪酬配置 (提供每课时基础薪酬与 salary_config_id)
    /// - `scope`: 班级范围; `AllAssigned` 不区分学期
    ///
    /// # 返回
    /// 成功结果按入库精度返回; 班级按 id 升序处理
    #[instrument(skip(self, config), fields(salary_config_id = config.id))]
    pub fn run(
        &self,
        config: &SalaryConfig,
        scope: ClassroomScope,
    ) -> RepositoryResult<SalaryPassResult> {
        let run_id = Uuid::new_v4().to_string();

        let semester_filter = match scope {
            ClassroomScope::AllAssigned => {
                let foreign = self
                    .classroom_repo
                    .count_assigned_outside_semester(config.semester_id)?;
                if foreign > 0 {
                    warn!(
                        run_id = %run_id,
                        semester_id = config.semester_id,
                        foreign_classrooms = foreign,
                        "计算范围包含其他学期的班级"
                    );
                }
                None
            }
            ClassroomScope::ConfigSemester => Some(config.semester_id),
        };

        let contexts = self.classroom_repo.find_assigned_contexts(semester_filter)?;
        info!(
            run_id = %run_id,
            classrooms = contexts.len(),
            "开始批量薪酬计算"
        );

        let mut succeeded = Vec::with_capacity(contexts.len());
        let mut failed = Vec::new();

        for context in &contexts {
            match compute_salary_for_classroom(context, config) {
                Ok(result) => {
                    let persisted = result.to_persisted_precision();
                    self.teacher_salary_repo.upsert(&persisted)?;
                    debug!(
                        run_id = %run_id,
                        classroom_id = persisted.classroom_id,
                        teacher_id = persisted.teacher_id,
                        total_salary = %persisted.total_salary,
                        "班级薪酬已写入"
                    );
                    succeeded.push(persisted);
                }
                Err(err) => {
                    warn!(
                        run_id = %run_id,
                        classroom_id = context.classroom.id,
                        error = %err,
                        "班级薪酬计算失败, 跳过"
                    );
                    failed.push(ClassroomFailure {
                        classroom_id: context.classroom.id,
                        classroom_name: context.classroom.name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            run_id = %run_id,
            succeeded = succeeded.len(),
            failed = failed.len(),
            "批量薪酬计算完成"
        );

        Ok(SalaryPassResult {
            run_id,
            salary_config_id: config.id,
            succeeded_count: succeeded.len(),
            failed_count: failed.len(),
            succeeded,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};
    use crate::domain::types::SalaryConfigStatus;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn setup() -> (Arc<Mutex<Connection>>, PayrollRepositories) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO academic_years (id, name) VALUES (1, '2025-2026');
            INSERT INTO semesters (id, name, academic_year_id) VALUES (1, 'HK1', 1), (2, 'HK2', 1);
            INSERT INTO degrees (id, name, base_salary_factor) VALUES (1, '博士', '2.0');
            INSERT INTO teachers (id, full_name, degree_id) VALUES (1, '张老师', 1);
            INSERT INTO courses (id, code, name, credits, lessons, course_coefficient)
                VALUES (1, 'CS001', '离散数学', 3, 30, '1.2');
            INSERT INTO classrooms (id, code, name, semester_id, course_id, teacher_id, students, class_coefficient)
                VALUES (1, 'LH001', '离散数学 N01', 1, 1, 1, 55, '0.1'),
                       (2, 'LH002', '无课程 N01', 1, NULL, 1, 40, '0.0'),
                       (3, 'LH003', '离散数学 N02', 2, 1, 1, 55, '0.1'),
                       (4, 'LH004', '未分配 N01', 1, 1, NULL, 55, '0.1');
            "#,
        )
        .unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let repos = PayrollRepositories::from_connection(conn.clone());
        (conn, repos)
    }

    fn create_config(repos: &PayrollRepositories) -> SalaryConfig {
        repos
            .salary_config_repo
            .insert(1, Decimal::from(50_000), SalaryConfigStatus::Draft)
            .unwrap()
    }

    #[test]
    fn test_failures_are_collected_and_pass_continues() {
        let (_conn, repos) = setup();
        let config = create_config(&repos);
        let pass = SalaryComputationPass::from_repositories(&repos);

        let result = pass.run(&config, ClassroomScope::AllAssigned).unwrap();

        assert_eq!(result.succeeded_count, 2);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.failed[0].classroom_id, 2);
        assert_eq!(result.failed[0].classroom_name, "无课程 N01");
        assert_eq!(
            result.succeeded.iter().map(|r| r.classroom_id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(repos.teacher_salary_repo.count_by_config(config.id).unwrap(), 2);
    }

    #[test]
    fn test_config_semester_scope_skips_other_semesters() {
        let (_conn, repos) = setup();
        let config = create_config(&repos);
        let pass = SalaryComputationPass::from_repositories(&repos);

        let result = pass.run(&config, ClassroomScope::ConfigSemester).unwrap();

        assert_eq!(result.succeeded_count, 1);
        assert_eq!(result.succeeded[0].classroom_id, 1);
        assert_eq!(result.succeeded[0].total_salary, Decimal::from(3_900_000));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let (_conn, repos) = setup();
        let config = create_config(&repos);
        let pass = SalaryComputationPass::from_repositories(&repos);

        pass.run(&config, ClassroomScope::AllAssigned).unwrap();
        let first = repos.teacher_salary_repo.find_by_config(config.id).unwrap();
        let second_run = pass.run(&config, ClassroomScope::AllAssigned).unwrap();
        let second = repos.teacher_salary_repo.find_by_config(config.id).unwrap();

        assert_ne!(second_run.run_id, String::new());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.total_salary, b.total_salary);
            assert_eq!(a.converted_lessons, b.converted_lessons);
            assert_eq!(a.class_coefficient, b.class_coefficient);
        }
    }
}
