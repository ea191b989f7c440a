// ==========================================
// 教师课时薪酬系统 - 日志初始化
// ==========================================
// 输出: 文本 (默认) 或 JSON (PAYROLL_LOG_FORMAT=json, 便于归档批量计算留痕)
// 级别: RUST_LOG, 未设置时本 crate 为 info, 依赖库为 warn
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的过滤规则
const DEFAULT_FILTER: &str = "warn,teaching_payroll=info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 解析 PAYROLL_LOG_FORMAT, 无法识别时按文本输出
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 按 PAYROLL_LOG_FORMAT 选择输出格式并初始化
///
/// ```no_run
/// teaching_payroll::logging::init_from_env();
/// ```
pub fn init_from_env() {
    let format = LogFormat::from_env_value(std::env::var("PAYROLL_LOG_FORMAT").ok().as_deref());
    match format {
        LogFormat::Text => init(),
        LogFormat::Json => init_json(),
    }
}

/// 文本格式
pub fn init() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// JSON 格式, 带当前 span 字段 (salary_config_id 等)
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(true)
        .init();
}

/// 测试用, 可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("teaching_payroll=debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("text")), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Text);
    }
}
