// ==========================================
// 教师课时薪酬系统 - 薪酬报表引擎
// ==========================================
// 职责: 按教师分组汇总薪酬记录; 生成学年口径的教师/院系/全校报表
// 输入: teacher_salaries 及其关联的展示信息
// 输出: SalaryReport / TeacherYearlyReport / DepartmentReport / SchoolReport
// ==========================================
// 红线: 只读, 空结果是合法结果 (零教师、零合计), 不报错
// total_lessons 累加的是折算课时 converted_lessons
// ==========================================

use crate::domain::report::{
    DepartmentReport, DepartmentTeacherRow, DepartmentTotals, SalaryRecordView, SalaryReport,
    SalarySummary, SchoolDepartmentRow, SchoolReport, SchoolTotals, SemesterBreakdown,
    TeacherSalarySummary, TeacherTotalsRow, TeacherYearlyReport,
};
use crate::domain::types::round_amount;
use crate::repository::error::RepositoryResult;
use crate::repository::TeacherSalaryRepository;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

// ==========================================
// 纯函数: 分组与过滤
// ==========================================

/// 按教师分组 (teacher_id 为键)
pub fn group_by_teacher(views: Vec<SalaryRecordView>) -> SalaryReport {
    let mut report = SalaryReport::new();
    for view in views {
        let summary = report
            .entry(view.salary.teacher_id)
            .or_insert_with(|| TeacherSalarySummary {
                teacher: view.teacher.clone(),
                classes: Vec::new(),
                total_salary: Decimal::ZERO,
                total_classes: 0,
                total_lessons: Decimal::ZERO,
            });
        summary.total_salary += view.salary.total_salary;
        summary.total_lessons += view.salary.converted_lessons;
        summary.total_classes += 1;
        summary.classes.push(view);
    }
    report
}

/// 仅保留指定院系的教师 (院系负责人视图)
pub fn filter_report_by_department(report: SalaryReport, department_id: i64) -> SalaryReport {
    report
        .into_iter()
        .filter(|(_, summary)| summary.teacher.department_id == Some(department_id))
        .collect()
}

/// 平均值, 除数为 0 时取 0
fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        round_amount(total / Decimal::from(count as u64))
    }
}

fn totals_row(summary: &TeacherSalarySummary) -> TeacherTotalsRow {
    TeacherTotalsRow {
        teacher: summary.teacher.clone(),
        total_salary: summary.total_salary,
        total_classes: summary.total_classes,
        total_lessons: summary.total_lessons,
    }
}

/// 按总薪酬降序, 同额按教师 id 升序
fn sort_by_salary_desc<T>(rows: &mut [T], key: impl Fn(&T) -> (Decimal, i64)) {
    rows.sort_by(|a, b| {
        let (salary_a, id_a) = key(a);
        let (salary_b, id_b) = key(b);
        salary_b.cmp(&salary_a).then(id_a.cmp(&id_b))
    });
}

// ==========================================
// SalaryReportEngine - 报表引擎
// ==========================================
pub struct SalaryReportEngine {
    teacher_salary_repo: Arc<TeacherSalaryRepository>,
}

impl SalaryReportEngine {
    pub fn new(teacher_salary_repo: Arc<TeacherSalaryRepository>) -> Self {
        Self { teacher_salary_repo }
    }

    /// 学期薪酬报表: 配置下全部薪酬记录按教师分组
    #[instrument(skip(self))]
    pub fn build_salary_report(&self, salary_config_id: i64) -> RepositoryResult<SalaryReport> {
        let views = self.teacher_salary_repo.find_views_by_config(salary_config_id)?;
        let report = group_by_teacher(views);
        debug!(teachers = report.len(), "学期薪酬报表已生成");
        Ok(report)
    }

    /// 教师学年报表: 按学期名称分组 + 学年汇总
    #[instrument(skip(self))]
    pub fn teacher_yearly_report(
        &self,
        teacher_id: i64,
        academic_year_id: i64,
    ) -> RepositoryResult<TeacherYearlyReport> {
        let views = self
            .teacher_salary_repo
            .find_views_by_academic_year(academic_year_id, Some(teacher_id))?;

        let mut summary = SalarySummary::default();
        let mut by_semester: BTreeMap<String, Vec<SalaryRecordView>> = BTreeMap::new();
        for view in views {
            summary.total_salary += view.salary.total_salary;
            summary.total_lessons += view.salary.converted_lessons;
            summary.total_classes += 1;
            by_semester
                .entry(view.semester_name.clone())
                .or_default()
                .push(view);
        }
        summary.average_salary_per_class = average(summary.total_salary, summary.total_classes);

        Ok(TeacherYearlyReport {
            teacher_id,
            academic_year_id,
            by_semester,
            summary,
        })
    }

    /// 院系学年报表
    ///
    /// 仅列出学年内薪酬大于 0 的教师, 按总薪酬降序
    #[instrument(skip(self))]
    pub fn department_report(
        &self,
        department_id: i64,
        academic_year_id: i64,
    ) -> RepositoryResult<DepartmentReport> {
        let views = self
            .teacher_salary_repo
            .find_views_by_academic_year(academic_year_id, None)?;
        let report = filter_report_by_department(group_by_teacher(views), department_id);

        let mut teachers: Vec<DepartmentTeacherRow> = report
            .into_values()
            .filter(|summary| summary.total_salary > Decimal::ZERO)
            .map(|summary| {
                let mut by_semester: BTreeMap<String, SemesterBreakdown> = BTreeMap::new();
                for class in &summary.classes {
                    let entry = by_semester.entry(class.semester_name.clone()).or_default();
                    entry.total_salary += class.salary.total_salary;
                    entry.total_lessons += class.salary.converted_lessons;
                    entry.total_classes += 1;
                }
                DepartmentTeacherRow {
                    teacher: summary.teacher,
                    total_salary: summary.total_salary,
                    total_classes: summary.total_classes,
                    total_lessons: summary.total_lessons,
                    by_semester,
                }
            })
            .collect();
        sort_by_salary_desc(&mut teachers, |row| (row.total_salary, row.teacher.id));

        let mut totals = teachers.iter().fold(DepartmentTotals::default(), |mut acc, row| {
            acc.total_teachers += 1;
            acc.total_salary += row.total_salary;
            acc.total_classes += row.total_classes;
            acc.total_lessons += row.total_lessons;
            acc
        });
        totals.average_salary_per_teacher = average(totals.total_salary, totals.total_teachers);

        Ok(DepartmentReport {
            department_id,
            academic_year_id,
            teachers,
            totals,
        })
    }

    /// 全校学年报表
    ///
    /// 每个院系列出前 `top_teachers` 名教师; 无有薪教师的院系不列出;
    /// 未归属院系的教师不计入
    #[instrument(skip(self))]
    pub fn school_report(
        &self,
        academic_year_id: i64,
        top_teachers: usize,
    ) -> RepositoryResult<SchoolReport> {
        let views = self
            .teacher_salary_repo
            .find_views_by_academic_year(academic_year_id, None)?;
        let report = group_by_teacher(views);

        let mut by_department: BTreeMap<i64, Vec<&TeacherSalarySummary>> = BTreeMap::new();
        for summary in report.values() {
            if summary.total_salary <= Decimal::ZERO {
                continue;
            }
            if let Some(department_id) = summary.teacher.department_id {
                by_department.entry(department_id).or_default().push(summary);
            }
        }

        let mut departments: Vec<SchoolDepartmentRow> = by_department
            .into_iter()
            .map(|(department_id, summaries)| {
                let mut rows: Vec<TeacherTotalsRow> =
                    summaries.iter().map(|summary| totals_row(summary)).collect();
                sort_by_salary_desc(&mut rows, |row| (row.total_salary, row.teacher.id));

                let department_name = rows
                    .first()
                    .and_then(|row| row.teacher.department_name.clone())
                    .unwrap_or_default();
                let teachers_count = rows.len();
                let total_salary: Decimal = rows.iter().map(|r| r.total_salary).sum();
                let total_classes: usize = rows.iter().map(|r| r.total_classes).sum();
                let total_lessons: Decimal = rows.iter().map(|r| r.total_lessons).sum();
                rows.truncate(top_teachers);

                SchoolDepartmentRow {
                    department_id,
                    department_name,
                    teachers_count,
                    total_salary,
                    total_classes,
                    total_lessons,
                    top_teachers: rows,
                }
            })
            .collect();
        sort_by_salary_desc(&mut departments, |row| (row.total_salary, row.department_id));

        let mut totals = departments.iter().fold(SchoolTotals::default(), |mut acc, row| {
            acc.total_departments += 1;
            acc.total_teachers += row.teachers_count;
            acc.total_salary += row.total_salary;
            acc.total_classes += row.total_classes;
            acc.total_lessons += row.total_lessons;
            acc
        });
        totals.average_salary_per_teacher = average(totals.total_salary, totals.total_teachers);
        totals.average_salary_per_department =
            average(totals.total_salary, totals.total_departments);

        Ok(SchoolReport {
            academic_year_id,
            departments,
            totals,
        })
    }
}
