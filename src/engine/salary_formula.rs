// ==========================================
// 教师课时薪酬系统 - 班级薪酬公式
// ==========================================
// 公式:
//   converted_lessons = actual_lessons * (course_coefficient + class_coefficient)
//   total_salary      = converted_lessons * teacher_coefficient * base_salary_per_lesson
// 红线: 公式内不截断、不舍入; 班级系数按当前人数重新计算, 不读取存量值
// ==========================================

use crate::domain::academic::ClassroomContext;
use crate::domain::salary::{SalaryConfig, SalaryResult};
use crate::engine::coefficient::compute_class_coefficient;
use crate::engine::error::{MissingLink, SalaryError};
use rust_decimal::Decimal;

/// 计算单个班级的薪酬
///
/// # 错误
/// 教师、课程或教师学位缺失时返回 `SalaryError::MissingAssociation`
pub fn compute_salary_for_classroom(
    context: &ClassroomContext,
    config: &SalaryConfig,
) -> Result<SalaryResult, SalaryError> {
    let classroom = &context.classroom;
    let missing = |missing| SalaryError::MissingAssociation {
        classroom_id: classroom.id,
        missing,
    };

    let teacher = context.teacher.as_ref().ok_or_else(|| missing(MissingLink::Teacher))?;
    let course = context.course.as_ref().ok_or_else(|| missing(MissingLink::Course))?;
    let degree = context.degree.as_ref().ok_or_else(|| missing(MissingLink::Degree))?;

    let actual_lessons = course.lessons;
    let class_coefficient = compute_class_coefficient(classroom.students);
    let course_coefficient = course.course_coefficient;
    let teacher_coefficient = degree.base_salary_factor;

    let converted_lessons =
        Decimal::from(actual_lessons) * (course_coefficient + class_coefficient);
    let total_salary = converted_lessons * teacher_coefficient * config.base_salary_per_lesson;

    Ok(SalaryResult {
        teacher_id: teacher.id,
        classroom_id: classroom.id,
        salary_config_id: config.id,
        actual_lessons,
        class_coefficient,
        course_coefficient,
        teacher_coefficient,
        converted_lessons,
        total_salary,
    })
}
