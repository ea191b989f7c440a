// ==========================================
// 教师课时薪酬系统 - 薪酬配置仓储
// ==========================================
// 表: salary_configs (semester_id 唯一)
// ==========================================

use crate::domain::salary::SalaryConfig;
use crate::domain::types::SalaryConfigStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{decimal_at, decimal_to_db};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

const CONFIG_COLUMNS: &str =
    "id, semester_id, base_salary_per_lesson, status, created_at, updated_at";

// ==========================================
// SalaryConfigRepository - 薪酬配置仓储
// ==========================================
pub struct SalaryConfigRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SalaryConfigRepository {
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

    /// 新增薪酬配置
    ///
    /// 同一学期重复创建时返回 UniqueConstraintViolation
    pub fn insert(
        &self,
        semester_id: i64,
        base_salary_per_lesson: Decimal,
        status: SalaryConfigStatus,
    ) -> RepositoryResult<SalaryConfig> {
        let conn = self.get_conn()?;
        let now = Utc::now().naive_utc();
        conn.execute(
            r#"
            INSERT INTO salary_configs (
                semester_id, base_salary_per_lesson, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
            params![
                semester_id,
                decimal_to_db(base_salary_per_lesson),
                status.to_db_str(),
                now,
            ],
        )?;

        Ok(SalaryConfig {
            id: conn.last_insert_rowid(),
            semester_id,
            base_salary_per_lesson,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<SalaryConfig>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM salary_configs WHERE id = ?1", CONFIG_COLUMNS);
        let config = conn.query_row(&sql, params![id], map_config).optional()?;
        Ok(config)
    }

    /// 查询学期对应的薪酬配置
    pub fn find_by_semester(&self, semester_id: i64) -> RepositoryResult<Option<SalaryConfig>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM salary_configs WHERE semester_id = ?1",
            CONFIG_COLUMNS
        );
        let config = conn
            .query_row(&sql, params![semester_id], map_config)
            .optional()?;
        Ok(config)
    }

    /// 查询全部薪酬配置 (最新在前)
    pub fn list_all(&self) -> RepositoryResult<Vec<SalaryConfig>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM salary_configs ORDER BY created_at DESC, id DESC",
            CONFIG_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let configs = stmt
            .query_map([], map_config)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(configs)
    }

    /// 更新状态
    pub fn update_status(&self, id: i64, status: SalaryConfigStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE salary_configs SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status.to_db_str(), Utc::now().naive_utc()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("SalaryConfig", id));
        }
        Ok(())
    }

    /// 删除配置 (级联删除其薪酬记录)
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM salary_configs WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("SalaryConfig", id));
        }
        Ok(())
    }
}

fn map_config(row: &Row<'_>) -> SqliteResult<SalaryConfig> {
    let raw_status: String = row.get(3)?;
    let status = SalaryConfigStatus::from_db_str(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("未知的薪酬配置状态: {}", raw_status).into(),
        )
    })?;

    Ok(SalaryConfig {
        id: row.get(0)?,
        semester_id: row.get(1)?,
        base_salary_per_lesson: decimal_at(row, 2)?,
        status,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
