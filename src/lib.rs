// ==========================================
// 教师课时薪酬系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按学期计算教师课时薪酬并出具报表
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 薪酬规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/表结构）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ClassroomScope, SalaryConfigStatus};

// 领域实体
pub use domain::{
    Classroom, ClassroomContext, Course, Degree, Department, ReportTotals, SalaryConfig,
    SalaryPassResult, SalaryReport, SalaryResult, Teacher, TeacherSalary, TeacherSalarySummary,
};

// 引擎
pub use engine::{
    compute_class_coefficient, compute_salary_for_classroom, SalaryComputationPass, SalaryError,
    SalaryReportEngine,
};

// API
pub use api::{CatalogueApi, ClassroomApi, ReportApi, SalaryApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "教师课时薪酬系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
