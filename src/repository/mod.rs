// ==========================================
// 教师课时薪酬系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod academic_repo;
pub mod classroom_repo;
pub mod code_generator;
pub mod error;
pub mod row_mapping;
pub mod salary_config_repo;
pub mod teacher_salary_repo;

// 重导出核心仓储
pub use academic_repo::AcademicRepository;
pub use classroom_repo::ClassroomRepository;
pub use code_generator::{next_code, CodeTarget};
pub use error::{RepositoryError, RepositoryResult};
pub use salary_config_repo::SalaryConfigRepository;
pub use teacher_salary_repo::TeacherSalaryRepository;
