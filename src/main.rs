// ==========================================
// 教师课时薪酬系统 - 命令行入口
// ==========================================
// 用法:
//   teaching-payroll compute <config_id>
//   teaching-payroll report <config_id> [department_id]
//   teaching-payroll export-csv <config_id> <path> [department_id]
//   teaching-payroll close <config_id>
//   teaching-payroll refresh-coefficients
//
// 数据库: PAYROLL_DB_PATH 或用户本地数据目录
// 日志: RUST_LOG 控制级别; PAYROLL_LOG_FORMAT=json 输出 JSON
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use std::fs::File;
use teaching_payroll::app::{get_default_db_path, AppState};
use teaching_payroll::logging;

const USAGE: &str = "用法: teaching-payroll <compute|report|export-csv|close|refresh-coefficients> [参数]";

fn parse_id(value: Option<String>, name: &str) -> Result<i64> {
    let raw = value.ok_or_else(|| anyhow!("缺少参数 {}\n{}", name, USAGE))?;
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("参数 {} 不是合法整数: {}", name, raw))
}

fn parse_optional_id(value: Option<String>, name: &str) -> Result<Option<i64>> {
    match value {
        Some(raw) => parse_id(Some(raw), name).map(Some),
        None => Ok(None),
    }
}

fn main() -> Result<()> {
    logging::init_from_env();

    let mut args = std::env::args().skip(1);
    let command = args.next().ok_or_else(|| anyhow!(USAGE))?;

    let db_path = get_default_db_path();
    tracing::info!("{} v{}, 数据库: {}", teaching_payroll::APP_NAME, teaching_payroll::VERSION, db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "compute" => {
            let config_id = parse_id(args.next(), "config_id")?;
            let outcome = state.salary_api.calculate(config_id)?;
            println!("{}", outcome.message);
            for failure in &outcome.pass.failed {
                println!(
                    "  失败: {} (id={}): {}",
                    failure.classroom_name, failure.classroom_id, failure.message
                );
            }
        }
        "report" => {
            let config_id = parse_id(args.next(), "config_id")?;
            let department_id = parse_optional_id(args.next(), "department_id")?;
            let response = state.salary_api.report(config_id, department_id)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "export-csv" => {
            let config_id = parse_id(args.next(), "config_id")?;
            let path = args.next().ok_or_else(|| anyhow!("缺少参数 path\n{}", USAGE))?;
            let department_id = parse_optional_id(args.next(), "department_id")?;
            let file = File::create(&path).with_context(|| format!("无法创建文件: {}", path))?;
            let rows = state
                .salary_api
                .export_report_csv(config_id, department_id, file)?;
            println!("已导出 {} 行到 {}", rows, path);
        }
        "close" => {
            let config_id = parse_id(args.next(), "config_id")?;
            let config = state.salary_api.close(config_id)?;
            println!("薪酬配置 {} 状态: {}", config.id, config.status.label());
        }
        "refresh-coefficients" => {
            let updated = state.classroom_api.refresh_all_coefficients()?;
            println!("已更新 {} 个班级的班级系数", updated);
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}
