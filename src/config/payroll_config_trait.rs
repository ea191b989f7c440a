// ==========================================
// 教师课时薪酬系统 - 薪酬配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::ClassroomScope;
use std::error::Error;

// ==========================================
// PayrollConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait PayrollConfigReader: Send + Sync {
    /// 批量计算的班级范围
    ///
    /// # 默认值
    /// - ALL_ASSIGNED
    fn get_classroom_scope(&self) -> Result<ClassroomScope, Box<dyn Error>>;

    /// 已关闭的配置是否允许重新计算
    ///
    /// # 默认值
    /// - false
    fn allow_recalc_closed(&self) -> Result<bool, Box<dyn Error>>;

    /// 单个班级的人数上限
    ///
    /// # 默认值
    /// - 200
    fn get_max_students(&self) -> Result<u32, Box<dyn Error>>;

    /// 全校报表中每个院系展示的教师数
    ///
    /// # 默认值
    /// - 5
    fn get_top_teachers_per_department(&self) -> Result<usize, Box<dyn Error>>;
}
