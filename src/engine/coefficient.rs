// ==========================================
// 教师课时薪酬系统 - 班级系数规则
// ==========================================
// 职责: 按班级人数查表得到班级系数
// 红线: 唯一一张分段表, 所有写入/计算路径共用
// ==========================================

use rust_decimal::Decimal;

/// 人数下限 -> 系数 (十分位), 按下限升序
///
/// 80 人以上与 70-79 同为 +0.3
const ENROLLMENT_BRACKETS: [(u32, i64); 8] = [
    (0, -3),
    (20, -2),
    (30, -1),
    (40, 0),
    (50, 1),
    (60, 2),
    (70, 3),
    (80, 3),
];

/// 计算班级系数
///
/// 纯函数, 无副作用; 新建班级、修改人数、批量回填与薪酬公式均调用此函数
pub fn compute_class_coefficient(enrollment: u32) -> Decimal {
    let tenths = ENROLLMENT_BRACKETS
        .iter()
        .rev()
        .find(|(lower, _)| enrollment >= *lower)
        .map(|(_, tenths)| *tenths)
        .unwrap_or(-3);

    Decimal::new(tenths, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenths(v: i64) -> Decimal {
        Decimal::new(v, 1)
    }

    #[test]
    fn test_bracket_boundaries() {
        let cases = [
            (0, -3),
            (19, -3),
            (20, -2),
            (29, -2),
            (30, -1),
            (39, -1),
            (40, 0),
            (49, 0),
            (50, 1),
            (59, 1),
            (60, 2),
            (69, 2),
            (70, 3),
            (79, 3),
            (80, 3),
        ];
        for (enrollment, expected) in cases {
            assert_eq!(
                compute_class_coefficient(enrollment),
                tenths(expected),
                "enrollment={}",
                enrollment
            );
        }
    }

    #[test]
    fn test_plateau_above_eighty() {
        assert_eq!(compute_class_coefficient(85), compute_class_coefficient(80));
        assert_eq!(compute_class_coefficient(200), tenths(3));
        assert_eq!(compute_class_coefficient(u32::MAX), tenths(3));
    }

    #[test]
    fn test_neutral_bracket_is_zero() {
        assert!(compute_class_coefficient(45).is_zero());
    }
}
