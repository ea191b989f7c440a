// ==========================================
// 教师课时薪酬系统 - 展示编码生成
// ==========================================
// 规则: 前缀 + 至少 3 位序号 (CS001, LH012, LH1000)
// 序号接续该前缀下纯数字后缀的最大值, 按数值而非字典序比较
// 后缀含非数字字符的编码 (手工录入的 CSX 等) 不参与取号
// ==========================================

use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection};

/// 需要自动编码的实体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTarget {
    Course,    // 课程 CS
    Classroom, // 班级 LH
}

impl CodeTarget {
    fn table(&self) -> &'static str {
        match self {
            CodeTarget::Course => "courses",
            CodeTarget::Classroom => "classrooms",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            CodeTarget::Course => "CS",
            CodeTarget::Classroom => "LH",
        }
    }
}

/// 生成下一个可用编码
///
/// 调用方需持有连接锁，保证读取与插入之间不被插队
pub fn next_code(conn: &Connection, target: CodeTarget) -> RepositoryResult<String> {
    let prefix = target.prefix();
    // GLOB 区分大小写, 'cs001' 不计入 CS 序列
    let sql = format!(
        "SELECT MAX(CAST(substr(code, ?2) AS INTEGER)) FROM {} \
         WHERE code GLOB ?1 AND length(code) > ?3 \
         AND substr(code, ?2) NOT GLOB '*[^0-9]*'",
        target.table()
    );

    let max_number: Option<i64> = conn.query_row(
        &sql,
        params![
            format!("{}*", prefix),
            prefix.len() as i64 + 1,
            prefix.len() as i64
        ],
        |row| row.get(0),
    )?;

    Ok(format!("{}{:03}", prefix, max_number.unwrap_or(0) + 1))
}
