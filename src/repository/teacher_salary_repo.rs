// ==========================================
// 教师课时薪酬系统 - 班级薪酬记录仓储
// ==========================================
// 表: teacher_salaries
// 唯一键: (teacher_id, classroom_id, salary_config_id), 写入一律 upsert
// 红线: Repository 不含业务逻辑, 分组汇总在引擎层完成
// ==========================================

use crate::domain::report::{SalaryRecordView, TeacherProfile};
use crate::domain::salary::{SalaryResult, TeacherSalary};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{decimal_at, decimal_to_db};
use chrono::Utc;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SALARY_COLUMNS: &str = r#"
    ts.id, ts.teacher_id, ts.classroom_id, ts.salary_config_id, ts.actual_lessons,
    ts.class_coefficient, ts.course_coefficient, ts.teacher_coefficient,
    ts.converted_lessons, ts.total_salary, ts.created_at, ts.updated_at
"#;

const VIEW_SELECT: &str = r#"
    SELECT
        ts.id, ts.teacher_id, ts.classroom_id, ts.salary_config_id, ts.actual_lessons,
        ts.class_coefficient, ts.course_coefficient, ts.teacher_coefficient,
        ts.converted_lessons, ts.total_salary, ts.created_at, ts.updated_at,
        t.full_name, t.email, t.department_id, d.name,
        c.code, c.name, co.code, co.name,
        s.id, s.name, s.academic_year_id
    FROM teacher_salaries ts
    JOIN teachers t ON t.id = ts.teacher_id
    LEFT JOIN departments d ON d.id = t.department_id
    JOIN classrooms c ON c.id = ts.classroom_id
    LEFT JOIN courses co ON co.id = c.course_id
    JOIN salary_configs sc ON sc.id = ts.salary_config_id
    JOIN semesters s ON s.id = sc.semester_id
"#;

// ==========================================
// TeacherSalaryRepository - 班级薪酬记录仓储
// ==========================================
pub struct TeacherSalaryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TeacherSalaryRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按三元组 upsert 一条薪酬记录
    ///
    /// 已存在时覆盖全部计算字段, created_at 保持不变
    pub fn upsert(&self, result: &SalaryResult) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let now = Utc::now().naive_utc();
        conn.execute(
            r#"
            INSERT INTO teacher_salaries (
                teacher_id, classroom_id, salary_config_id,
                actual_lessons, class_coefficient, course_coefficient, teacher_coefficient,
                converted_lessons, total_salary, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            ON CONFLICT (teacher_id, classroom_id, salary_config_id) DO UPDATE SET
                actual_lessons = excluded.actual_lessons,
                class_coefficient = excluded.class_coefficient,
                course_coefficient = excluded.course_coefficient,
                teacher_coefficient = excluded.teacher_coefficient,
                converted_lessons = excluded.converted_lessons,
                total_salary = excluded.total_salary,
                updated_at = excluded.updated_at
            "#,
            params![
                result.teacher_id,
                result.classroom_id,
                result.salary_config_id,
                result.actual_lessons,
                decimal_to_db(result.class_coefficient),
                decimal_to_db(result.course_coefficient),
                decimal_to_db(result.teacher_coefficient),
                decimal_to_db(result.converted_lessons),
                decimal_to_db(result.total_salary),
                now,
            ],
        )?;
        Ok(())
    }

    /// 查询配置下的全部薪酬记录 (不含关联)
    pub fn find_by_config(&self, salary_config_id: i64) -> RepositoryResult<Vec<TeacherSalary>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM teacher_salaries ts WHERE ts.salary_config_id = ?1 ORDER BY ts.teacher_id, ts.classroom_id",
            SALARY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let salaries = stmt
            .query_map(params![salary_config_id], map_salary)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(salaries)
    }

    /// 查询配置下的薪酬记录及教师/院系/班级/课程信息
    pub fn find_views_by_config(
        &self,
        salary_config_id: i64,
    ) -> RepositoryResult<Vec<SalaryRecordView>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE ts.salary_config_id = ?1 ORDER BY ts.teacher_id, ts.classroom_id",
            VIEW_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let views = stmt
            .query_map(params![salary_config_id], map_view)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(views)
    }

    /// 查询学年内 (所有学期配置) 的薪酬记录
    ///
    /// # 参数
    /// - `academic_year_id`: 学年
    /// - `teacher_id`: Some 时仅限该教师
    pub fn find_views_by_academic_year(
        &self,
        academic_year_id: i64,
        teacher_id: Option<i64>,
    ) -> RepositoryResult<Vec<SalaryRecordView>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE s.academic_year_id = ?1 AND (?2 IS NULL OR ts.teacher_id = ?2) \
             ORDER BY ts.teacher_id, s.id, ts.classroom_id",
            VIEW_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let views = stmt
            .query_map(params![academic_year_id, teacher_id], map_view)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(views)
    }

    /// 统计配置下的记录数
    pub fn count_by_config(&self, salary_config_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM teacher_salaries WHERE salary_config_id = ?1",
            params![salary_config_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_salary(row: &Row<'_>) -> SqliteResult<TeacherSalary> {
    Ok(TeacherSalary {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        classroom_id: row.get(2)?,
        salary_config_id: row.get(3)?,
        actual_lessons: row.get(4)?,
        class_coefficient: decimal_at(row, 5)?,
        course_coefficient: decimal_at(row, 6)?,
        teacher_coefficient: decimal_at(row, 7)?,
        converted_lessons: decimal_at(row, 8)?,
        total_salary: decimal_at(row, 9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn map_view(row: &Row<'_>) -> SqliteResult<SalaryRecordView> {
    let salary = map_salary(row)?;
    let teacher = TeacherProfile {
        id: salary.teacher_id,
        full_name: row.get(12)?,
        email: row.get(13)?,
        department_id: row.get(14)?,
        department_name: row.get(15)?,
    };

    Ok(SalaryRecordView {
        salary,
        teacher,
        classroom_code: row.get(16)?,
        classroom_name: row.get(17)?,
        course_code: row.get(18)?,
        course_name: row.get(19)?,
        semester_id: row.get(20)?,
        semester_name: row.get(21)?,
        academic_year_id: row.get(22)?,
    })
}
