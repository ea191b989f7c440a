// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use std::error::Error;
use teaching_payroll::config::PayrollConfigReader;
use teaching_payroll::domain::types::ClassroomScope;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub classroom_scope: ClassroomScope,
    pub allow_recalc_closed: bool,
    pub max_students: u32,
    pub top_teachers_per_department: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            classroom_scope: ClassroomScope::AllAssigned,
            allow_recalc_closed: false,
            max_students: 200,
            top_teachers_per_department: 5,
        }
    }
}

impl MockConfig {
    /// 仅计算配置所属学期
    pub fn semester_scoped() -> Self {
        Self {
            classroom_scope: ClassroomScope::ConfigSemester,
            ..Self::default()
        }
    }

    pub fn with_top_teachers(top: usize) -> Self {
        Self {
            top_teachers_per_department: top,
            ..Self::default()
        }
    }
}

impl PayrollConfigReader for MockConfig {
    fn get_classroom_scope(&self) -> Result<ClassroomScope, Box<dyn Error>> {
        Ok(self.classroom_scope)
    }

    fn allow_recalc_closed(&self) -> Result<bool, Box<dyn Error>> {
        Ok(self.allow_recalc_closed)
    }

    fn get_max_students(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.max_students)
    }

    fn get_top_teachers_per_department(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.top_teachers_per_department)
    }
}
