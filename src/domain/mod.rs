// ==========================================
// 教师课时薪酬系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod academic;
pub mod report;
pub mod salary;
pub mod types;

// 重导出核心类型
pub use academic::{
    AcademicYear, Classroom, ClassroomContext, Course, Degree, Department, NewClassroom,
    NewCourse, NewTeacher, Semester, Teacher,
};
pub use report::{
    DepartmentReport, DepartmentTeacherRow, DepartmentTotals, ReportTotals, SalaryRecordView,
    SalaryReport, SalarySummary, SchoolDepartmentRow, SchoolReport, SchoolTotals,
    SemesterBreakdown, TeacherProfile, TeacherSalarySummary, TeacherTotalsRow,
    TeacherYearlyReport,
};
pub use salary::{ClassroomFailure, SalaryConfig, SalaryPassResult, SalaryResult, TeacherSalary};
pub use types::{ClassroomScope, SalaryConfigStatus};
