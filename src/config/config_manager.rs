// ==========================================
// 教师课时薪酬系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::payroll_config_trait::PayrollConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::ClassroomScope;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值 (存在则覆盖)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON格式, 按 key 排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// PayrollConfigReader 实现
// ==========================================
// 非法值回退为默认值并记录 warn
impl PayrollConfigReader for ConfigManager {
    fn get_classroom_scope(&self) -> Result<ClassroomScope, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::CLASSROOM_SCOPE,
            ClassroomScope::default().to_db_str(),
        )?;
        Ok(ClassroomScope::from_config_str(&value).unwrap_or_else(|| {
            warn!(key = config_keys::CLASSROOM_SCOPE, value = %value, "配置值无效, 使用默认值");
            ClassroomScope::default()
        }))
    }

    fn allow_recalc_closed(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::ALLOW_RECALC_CLOSED, "false")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => {
                warn!(key = config_keys::ALLOW_RECALC_CLOSED, value = %value, "配置值无效, 使用默认值");
                Ok(false)
            }
        }
    }

    fn get_max_students(&self) -> Result<u32, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::MAX_STUDENTS, "200")?;
        Ok(value.trim().parse::<u32>().unwrap_or(200))
    }

    fn get_top_teachers_per_department(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::TOP_TEACHERS_PER_DEPARTMENT, "5")?;
        Ok(value.trim().parse::<usize>().unwrap_or(5))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 批量计算
    pub const CLASSROOM_SCOPE: &str = "salary.classroom_scope";
    pub const ALLOW_RECALC_CLOSED: &str = "salary.allow_recalc_closed";

    // 班级
    pub const MAX_STUDENTS: &str = "classroom.max_students";

    // 报表
    pub const TOP_TEACHERS_PER_DEPARTMENT: &str = "report.top_teachers_per_department";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let manager = setup_manager();
        assert_eq!(manager.get_classroom_scope().unwrap(), ClassroomScope::AllAssigned);
        assert!(!manager.allow_recalc_closed().unwrap());
        assert_eq!(manager.get_max_students().unwrap(), 200);
        assert_eq!(manager.get_top_teachers_per_department().unwrap(), 5);
    }

    #[test]
    fn test_set_value_overrides_default() {
        let manager = setup_manager();
        manager
            .set_global_config_value(config_keys::CLASSROOM_SCOPE, "config_semester")
            .unwrap();
        manager
            .set_global_config_value(config_keys::MAX_STUDENTS, "120")
            .unwrap();
        manager
            .set_global_config_value(config_keys::MAX_STUDENTS, "150")
            .unwrap();

        assert_eq!(manager.get_classroom_scope().unwrap(), ClassroomScope::ConfigSemester);
        assert_eq!(manager.get_max_students().unwrap(), 150);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let manager = setup_manager();
        manager
            .set_global_config_value(config_keys::CLASSROOM_SCOPE, "EVERYTHING")
            .unwrap();
        manager
            .set_global_config_value(config_keys::ALLOW_RECALC_CLOSED, "maybe")
            .unwrap();

        assert_eq!(manager.get_classroom_scope().unwrap(), ClassroomScope::AllAssigned);
        assert!(!manager.allow_recalc_closed().unwrap());
    }

    #[test]
    fn test_snapshot_lists_global_keys() {
        let manager = setup_manager();
        manager
            .set_global_config_value(config_keys::TOP_TEACHERS_PER_DEPARTMENT, "3")
            .unwrap();

        let snapshot: serde_json::Value =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot[config_keys::TOP_TEACHERS_PER_DEPARTMENT], "3");
    }
}
