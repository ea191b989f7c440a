// ==========================================
// 教师课时薪酬系统 - 教学基础数据仓储
// ==========================================
// 表: departments / degrees / teachers / courses / academic_years / semesters
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::academic::{
    AcademicYear, Course, Degree, Department, NewCourse, NewTeacher, Semester, Teacher,
};
use crate::repository::code_generator::{next_code, CodeTarget};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{decimal_at, decimal_to_db};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

// ==========================================
// AcademicRepository - 教学基础数据仓储
// ==========================================
/// 教学基础数据仓储
/// 职责: 院系、学位、教师、课程、学年、学期的新增与查询
pub struct AcademicRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AcademicRepository {
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

    // ===== 院系 =====

    pub fn insert_department(
        &self,
        name: &str,
        abbr_name: Option<&str>,
        description: Option<&str>,
    ) -> RepositoryResult<Department> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO departments (name, abbr_name, description) VALUES (?1, ?2, ?3)",
            params![name, abbr_name, description],
        )?;
        Ok(Department {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            abbr_name: abbr_name.map(str::to_string),
            description: description.map(str::to_string),
        })
    }

    pub fn find_department(&self, id: i64) -> RepositoryResult<Option<Department>> {
        let conn = self.get_conn()?;
        let department = conn
            .query_row(
                "SELECT id, name, abbr_name, description FROM departments WHERE id = ?1",
                params![id],
                map_department,
            )
            .optional()?;
        Ok(department)
    }

    pub fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, abbr_name, description FROM departments ORDER BY id")?;
        let departments = stmt
            .query_map([], map_department)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(departments)
    }

    // ===== 学位 =====

    pub fn insert_degree(&self, name: &str, base_salary_factor: Decimal) -> RepositoryResult<Degree> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO degrees (name, base_salary_factor) VALUES (?1, ?2)",
            params![name, decimal_to_db(base_salary_factor)],
        )?;
        Ok(Degree {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            base_salary_factor,
        })
    }

    pub fn find_degree(&self, id: i64) -> RepositoryResult<Option<Degree>> {
        let conn = self.get_conn()?;
        let degree = conn
            .query_row(
                "SELECT id, name, base_salary_factor FROM degrees WHERE id = ?1",
                params![id],
                map_degree,
            )
            .optional()?;
        Ok(degree)
    }

    pub fn list_degrees(&self) -> RepositoryResult<Vec<Degree>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, base_salary_factor FROM degrees ORDER BY id")?;
        let degrees = stmt
            .query_map([], map_degree)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(degrees)
    }

    /// 更新学位系数 (已入库的薪酬快照不受影响)
    pub fn update_degree_factor(&self, id: i64, base_salary_factor: Decimal) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE degrees SET base_salary_factor = ?2 WHERE id = ?1",
            params![id, decimal_to_db(base_salary_factor)],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Degree", id));
        }
        Ok(())
    }

    // ===== 教师 =====

    pub fn insert_teacher(&self, teacher: &NewTeacher) -> RepositoryResult<Teacher> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO teachers (full_name, date_of_birth, phone, email, degree_id, department_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                teacher.full_name,
                teacher.date_of_birth,
                teacher.phone,
                teacher.email,
                teacher.degree_id,
                teacher.department_id,
            ],
        )?;
        Ok(Teacher {
            id: conn.last_insert_rowid(),
            full_name: teacher.full_name.clone(),
            date_of_birth: teacher.date_of_birth,
            phone: teacher.phone.clone(),
            email: teacher.email.clone(),
            degree_id: teacher.degree_id,
            department_id: teacher.department_id,
        })
    }

    pub fn find_teacher(&self, id: i64) -> RepositoryResult<Option<Teacher>> {
        let conn = self.get_conn()?;
        let teacher = conn
            .query_row(
                r#"
                SELECT id, full_name, date_of_birth, phone, email, degree_id, department_id
                FROM teachers WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Teacher {
                        id: row.get(0)?,
                        full_name: row.get(1)?,
                        date_of_birth: row.get(2)?,
                        phone: row.get(3)?,
                        email: row.get(4)?,
                        degree_id: row.get(5)?,
                        department_id: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(teacher)
    }

    // ===== 课程 =====

    /// 新增课程
    ///
    /// code 为空时按 CSxxx 自动编码；course_coefficient 为空时取 1.0
    pub fn insert_course(&self, course: &NewCourse) -> RepositoryResult<Course> {
        let conn = self.get_conn()?;
        let code = match course.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => next_code(&conn, CodeTarget::Course)?,
        };
        let coefficient = course.course_coefficient.unwrap_or(Decimal::ONE);

        conn.execute(
            r#"
            INSERT INTO courses (code, name, credits, lessons, course_coefficient, department_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                code,
                course.name,
                course.credits,
                course.lessons,
                decimal_to_db(coefficient),
                course.department_id,
            ],
        )?;
        Ok(Course {
            id: conn.last_insert_rowid(),
            code,
            name: course.name.clone(),
            credits: course.credits,
            lessons: course.lessons,
            course_coefficient: coefficient,
            department_id: course.department_id,
        })
    }

    pub fn find_course(&self, id: i64) -> RepositoryResult<Option<Course>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                r#"
                SELECT id, code, name, credits, lessons, course_coefficient, department_id
                FROM courses WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Course {
                        id: row.get(0)?,
                        code: row.get(1)?,
                        name: row.get(2)?,
                        credits: row.get(3)?,
                        lessons: row.get(4)?,
                        course_coefficient: decimal_at(row, 5)?,
                        department_id: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(course)
    }

    /// 更新课程系数 (已入库的薪酬快照不受影响)
    pub fn update_course_coefficient(&self, id: i64, coefficient: Decimal) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE courses SET course_coefficient = ?2 WHERE id = ?1",
            params![id, decimal_to_db(coefficient)],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Course", id));
        }
        Ok(())
    }

    // ===== 学年 / 学期 =====

    pub fn insert_academic_year(
        &self,
        name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> RepositoryResult<AcademicYear> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO academic_years (name, start_date, end_date) VALUES (?1, ?2, ?3)",
            params![name, start_date, end_date],
        )?;
        Ok(AcademicYear {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            start_date,
            end_date,
        })
    }

    pub fn insert_semester(
        &self,
        name: &str,
        academic_year_id: i64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> RepositoryResult<Semester> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO semesters (name, academic_year_id, start_date, end_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![name, academic_year_id, start_date, end_date],
        )?;
        Ok(Semester {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            academic_year_id,
            start_date,
            end_date,
        })
    }

    pub fn find_semester(&self, id: i64) -> RepositoryResult<Option<Semester>> {
        let conn = self.get_conn()?;
        let semester = conn
            .query_row(
                r#"
                SELECT id, name, academic_year_id, start_date, end_date
                FROM semesters WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Semester {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        academic_year_id: row.get(2)?,
                        start_date: row.get(3)?,
                        end_date: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(semester)
    }
}

fn map_department(row: &Row<'_>) -> SqliteResult<Department> {
    Ok(Department {
        id: row.get(0)?,
        name: row.get(1)?,
        abbr_name: row.get(2)?,
        description: row.get(3)?,
    })
}

fn map_degree(row: &Row<'_>) -> SqliteResult<Degree> {
    Ok(Degree {
        id: row.get(0)?,
        name: row.get(1)?,
        base_salary_factor: decimal_at(row, 2)?,
    })
}
