// ==========================================
// 教师课时薪酬系统 - 行映射工具
// ==========================================
// 职责: TEXT 十进制列的读写转换
// ==========================================

use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::Decimal;

/// 读取 TEXT 存储的十进制列
pub fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 读取可空的 TEXT 十进制列
pub fn opt_decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => raw
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

/// 十进制值的入库表示
pub fn decimal_to_db(value: Decimal) -> String {
    value.to_string()
}
