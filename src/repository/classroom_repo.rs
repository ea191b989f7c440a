// ==========================================
// 教师课时薪酬系统 - 班级数据仓储
// ==========================================
// 表: classrooms (关联 teachers / degrees / courses)
// 红线: Repository 不含业务逻辑, class_coefficient 由调用方计算后传入
// ==========================================

use crate::domain::academic::{Classroom, ClassroomContext, Course, Degree, NewClassroom, Teacher};
use crate::repository::code_generator::{next_code, CodeTarget};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{decimal_at, decimal_to_db, opt_decimal_at};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

const CLASSROOM_COLUMNS: &str =
    "id, code, name, semester_id, course_id, teacher_id, students, class_coefficient";

// ==========================================
// ClassroomRepository - 班级仓储
// ==========================================
pub struct ClassroomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassroomRepository {
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

    /// 新增班级
    ///
    /// # 参数
    /// - `classroom`: 班级输入 (code 为空时自动编码 LHxxx)
    /// - `class_coefficient`: 按 students 计算好的班级系数
    pub fn insert(
        &self,
        classroom: &NewClassroom,
        class_coefficient: Decimal,
    ) -> RepositoryResult<Classroom> {
        let conn = self.get_conn()?;
        let code = match classroom.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => next_code(&conn, CodeTarget::Classroom)?,
        };

        conn.execute(
            r#"
            INSERT INTO classrooms (
                code, name, semester_id, course_id, teacher_id, students, class_coefficient
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                code,
                classroom.name,
                classroom.semester_id,
                classroom.course_id,
                classroom.teacher_id,
                classroom.students,
                decimal_to_db(class_coefficient),
            ],
        )?;

        Ok(Classroom {
            id: conn.last_insert_rowid(),
            code,
            name: classroom.name.clone(),
            semester_id: classroom.semester_id,
            course_id: classroom.course_id,
            teacher_id: classroom.teacher_id,
            students: classroom.students,
            class_coefficient,
        })
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Classroom>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM classrooms WHERE id = ?1", CLASSROOM_COLUMNS);
        let classroom = conn.query_row(&sql, params![id], map_classroom).optional()?;
        Ok(classroom)
    }

    /// 查询全部班级 (按 id 升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Classroom>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM classrooms ORDER BY id ASC", CLASSROOM_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let classrooms = stmt
            .query_map([], map_classroom)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(classrooms)
    }

    /// 同一学期、同一课程下是否已存在同名班级
    pub fn exists_by_name(
        &self,
        semester_id: i64,
        course_id: Option<i64>,
        name: &str,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let exists = conn
            .query_row(
                r#"
                SELECT 1 FROM classrooms
                WHERE semester_id = ?1 AND course_id IS ?2 AND name = ?3
                LIMIT 1
                "#,
                params![semester_id, course_id, name],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 更新人数及其派生的班级系数
    pub fn update_enrollment(
        &self,
        id: i64,
        students: u32,
        class_coefficient: Decimal,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE classrooms SET students = ?2, class_coefficient = ?3 WHERE id = ?1",
            params![id, students, decimal_to_db(class_coefficient)],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Classroom", id));
        }
        Ok(())
    }

    /// 分配/取消分配教师
    pub fn update_teacher(&self, id: i64, teacher_id: Option<i64>) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE classrooms SET teacher_id = ?2 WHERE id = ?1",
            params![id, teacher_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Classroom", id));
        }
        Ok(())
    }

    /// 查询已分配教师的班级及其关联 (教师→学位、课程)
    ///
    /// # 参数
    /// - `semester_id`: Some 时仅返回该学期的班级; None 时不区分学期
    ///
    /// # 返回
    /// 按班级 id 升序; 关联缺失 (课程/学位) 以 None 返回
    pub fn find_assigned_contexts(
        &self,
        semester_id: Option<i64>,
    ) -> RepositoryResult<Vec<ClassroomContext>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                c.id, c.code, c.name, c.semester_id, c.course_id, c.teacher_id,
                c.students, c.class_coefficient,
                t.id, t.full_name, t.date_of_birth, t.phone, t.email, t.degree_id, t.department_id,
                dg.id, dg.name, dg.base_salary_factor,
                co.id, co.code, co.name, co.credits, co.lessons, co.course_coefficient, co.department_id
            FROM classrooms c
            LEFT JOIN teachers t ON t.id = c.teacher_id
            LEFT JOIN degrees dg ON dg.id = t.degree_id
            LEFT JOIN courses co ON co.id = c.course_id
            WHERE c.teacher_id IS NOT NULL
              AND (?1 IS NULL OR c.semester_id = ?1)
            ORDER BY c.id ASC
            "#,
        )?;

        let contexts = stmt
            .query_map(params![semester_id], map_context)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(contexts)
    }

    /// 统计不属于指定学期的已分配班级数量
    pub fn count_assigned_outside_semester(&self, semester_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM classrooms WHERE teacher_id IS NOT NULL AND semester_id != ?1",
            params![semester_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_classroom(row: &Row<'_>) -> SqliteResult<Classroom> {
    Ok(Classroom {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        semester_id: row.get(3)?,
        course_id: row.get(4)?,
        teacher_id: row.get(5)?,
        students: row.get(6)?,
        class_coefficient: decimal_at(row, 7)?,
    })
}

fn map_context(row: &Row<'_>) -> SqliteResult<ClassroomContext> {
    let classroom = map_classroom(row)?;

    let teacher = match row.get::<_, Option<i64>>(8)? {
        Some(id) => Some(Teacher {
            id,
            full_name: row.get(9)?,
            date_of_birth: row.get(10)?,
            phone: row.get(11)?,
            email: row.get(12)?,
            degree_id: row.get(13)?,
            department_id: row.get(14)?,
        }),
        None => None,
    };

    let degree = match (row.get::<_, Option<i64>>(15)?, opt_decimal_at(row, 17)?) {
        (Some(id), Some(base_salary_factor)) => Some(Degree {
            id,
            name: row.get(16)?,
            base_salary_factor,
        }),
        _ => None,
    };

    let course = match row.get::<_, Option<i64>>(18)? {
        Some(id) => Some(Course {
            id,
            code: row.get(19)?,
            name: row.get(20)?,
            credits: row.get(21)?,
            lessons: row.get(22)?,
            course_coefficient: decimal_at(row, 23)?,
            department_id: row.get(24)?,
        }),
        None => None,
    };

    Ok(ClassroomContext {
        classroom,
        teacher,
        degree,
        course,
    })
}
