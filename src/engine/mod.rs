// ==========================================
// 教师课时薪酬系统 - 引擎层
// ==========================================
// 职责: 实现薪酬规则与汇总, 不拼 SQL
// 红线: Engine 不拼 SQL, 数据访问一律经由 Repository
// ==========================================

pub mod coefficient;
pub mod computation_pass;
pub mod error;
pub mod report;
pub mod repositories;
pub mod salary_formula;

// 重导出核心引擎
pub use coefficient::compute_class_coefficient;
pub use computation_pass::SalaryComputationPass;
pub use error::{MissingLink, SalaryError};
pub use report::{filter_report_by_department, group_by_teacher, SalaryReportEngine};
pub use repositories::PayrollRepositories;
pub use salary_formula::compute_salary_for_classroom;
