// ==========================================
// 教师课时薪酬系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{CatalogueApi, ClassroomApi, ReportApi, SalaryApi};
use crate::config::{ConfigManager, PayrollConfigReader};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::PayrollRepositories;

/// 应用状态
///
/// 所有 Repository 与 API 共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 仓储集合 (基础数据维护)
    pub repos: PayrollRepositories,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 基础数据API
    pub catalogue_api: Arc<CatalogueApi>,

    /// 班级管理API
    pub classroom_api: Arc<ClassroomApi>,

    /// 薪酬管理API
    pub salary_api: Arc<SalaryApi>,

    /// 学年报表API
    pub report_api: Arc<ReportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 打开数据库并确保表结构存在, 随后初始化仓储与 API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let repos = PayrollRepositories::from_connection(conn.clone());
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_reader: Arc<dyn PayrollConfigReader> = config_manager.clone();

        let catalogue_api = Arc::new(CatalogueApi::new(&repos));
        let classroom_api = Arc::new(ClassroomApi::new(&repos, config_reader.clone()));
        let salary_api = Arc::new(SalaryApi::new(&repos, config_reader.clone()));
        let report_api = Arc::new(ReportApi::new(&repos, config_reader));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            repos,
            config_manager,
            catalogue_api,
            classroom_api,
            salary_api,
            report_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先使用环境变量 PAYROLL_DB_PATH, 否则为用户本地数据目录下的
/// teaching-payroll/payroll.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("PAYROLL_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./payroll.db");
    if let Some(data_dir) = dirs::data_local_dir() {
        let dir = data_dir.join("teaching-payroll");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("payroll.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_app_state_initializes_schema() {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        let state = AppState::new(db_path).unwrap();
        assert!(state.salary_api.list_configs().unwrap().is_empty());
        assert_eq!(state.config_manager.get_max_students().unwrap(), 200);
    }
}
