// ==========================================
// 教师课时薪酬系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行与上层调用
// ==========================================

pub mod catalogue_api;
pub mod classroom_api;
pub mod error;
pub mod report_api;
pub mod salary_api;

// 重导出核心类型
pub use catalogue_api::CatalogueApi;
pub use classroom_api::{BulkClassroomRequest, ClassroomApi, MAX_BULK_CLASSROOMS};
pub use error::{ApiError, ApiResult};
pub use report_api::ReportApi;
pub use salary_api::{CalculationOutcome, SalaryApi, SalaryReportResponse};
