// ==========================================
// 学期薪酬报表集成测试
// ==========================================
// 测试目标: 按教师分组合计 / 院系过滤 / 空报表 / CSV 导出
// ==========================================

mod test_helpers;
#[path = "helpers/mock_config.rs"]
mod mock_config;

use mock_config::MockConfig;
use rust_decimal::Decimal;
use std::sync::Arc;
use teaching_payroll::api::SalaryApi;
use teaching_payroll::logging;
use test_helpers::*;

/// 两位教师各两个班级, 学位系数 1.0, 每课时 100000, 课程系数 1.0, 45 人 (班级系数 0)
struct TwoTeacherFixture {
    api: SalaryApi,
    config_id: i64,
    teacher_a: i64,
    teacher_b: i64,
    campus: Campus,
}

fn setup_two_teachers(db_path: &str) -> TwoTeacherFixture {
    let (_conn, repos) = open_repos(db_path);
    let campus = seed_campus(&repos);

    let degree = insert_degree(&repos, "学士", dec1(10));
    let teacher_a = insert_teacher(&repos, "甲老师", Some(degree.id), Some(campus.dept_it.id));
    let teacher_b = insert_teacher(&repos, "乙老师", Some(degree.id), Some(campus.dept_math.id));

    let semester = campus.semester_1.id;
    for (teacher_id, lessons) in [(teacher_a.id, 10), (teacher_a.id, 20), (teacher_b.id, 30), (teacher_b.id, 40)] {
        let course = insert_course(&repos, &format!("课程{}", lessons), lessons, dec1(10));
        insert_classroom(
            &repos,
            &format!("课程{} N01", lessons),
            semester,
            Some(course.id),
            Some(teacher_id),
            45,
        );
    }

    let api = SalaryApi::new(&repos, Arc::new(MockConfig::default()));
    let config = api
        .create_config(semester, Decimal::from(100_000))
        .expect("Failed to create salary config");
    api.calculate(config.id).expect("Failed to calculate");

    TwoTeacherFixture {
        api,
        config_id: config.id,
        teacher_a: teacher_a.id,
        teacher_b: teacher_b.id,
        campus,
    }
}

#[test]
fn test_report_groups_by_teacher_with_totals() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let fixture = setup_two_teachers(&db_path);

    let response = fixture.api.report(fixture.config_id, None).unwrap();
    assert_eq!(response.report.len(), 2);

    let a = &response.report[&fixture.teacher_a];
    assert_eq!(a.total_salary, Decimal::from(3_000_000));
    assert_eq!(a.total_lessons, Decimal::from(30));
    assert_eq!(a.total_classes, 2);
    assert_eq!(a.teacher.full_name, "甲老师");
    assert_eq!(a.teacher.department_name.as_deref(), Some("信息学院"));

    let b = &response.report[&fixture.teacher_b];
    assert_eq!(b.total_salary, Decimal::from(7_000_000));
    assert_eq!(b.total_lessons, Decimal::from(70));
    assert_eq!(b.total_classes, 2);

    assert_eq!(response.totals.total_teachers, 2);
    assert_eq!(response.totals.total_classes, 4);
    assert_eq!(response.totals.total_lessons, Decimal::from(100));
    assert_eq!(response.totals.total_salary, Decimal::from(10_000_000));
}

#[test]
fn test_report_filtered_by_department() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let fixture = setup_two_teachers(&db_path);

    let response = fixture
        .api
        .report(fixture.config_id, Some(fixture.campus.dept_math.id))
        .unwrap();

    assert_eq!(response.department_id, Some(fixture.campus.dept_math.id));
    assert_eq!(response.report.len(), 1);
    assert!(response.report.contains_key(&fixture.teacher_b));
    assert_eq!(response.totals.total_teachers, 1);
    assert_eq!(response.totals.total_classes, 2);
    assert_eq!(response.totals.total_salary, Decimal::from(7_000_000));
}

#[test]
fn test_report_for_config_without_records_is_empty() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_conn, repos) = open_repos(&db_path);
    let campus = seed_campus(&repos);

    let api = SalaryApi::new(&repos, Arc::new(MockConfig::default()));
    let config = api
        .create_config(campus.semester_2.id, Decimal::from(100))
        .unwrap();

    let response = api.report(config.id, None).unwrap();
    assert!(response.report.is_empty());
    assert_eq!(response.totals.total_teachers, 0);
    assert_eq!(response.totals.total_classes, 0);
    assert_eq!(response.totals.total_salary, Decimal::ZERO);
}

#[test]
fn test_report_for_unknown_config_is_not_found() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_conn, repos) = open_repos(&db_path);
    let api = SalaryApi::new(&repos, Arc::new(MockConfig::default()));

    let err = api.report(999, None).unwrap_err();
    assert!(err.to_string().contains("999"));
}

#[test]
fn test_export_report_csv() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let fixture = setup_two_teachers(&db_path);

    let mut buffer = Vec::new();
    let rows = fixture
        .api
        .export_report_csv(fixture.config_id, None, &mut buffer)
        .unwrap();
    assert_eq!(rows, 4);

    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("teacher_id,teacher_name,department,"));
    assert!(lines[0].ends_with("converted_lessons,total_salary"));
    assert!(lines[1].contains("甲老师"));
    assert!(lines[4].contains("乙老师"));
    assert!(lines[4].contains("数学学院"));

    let mut filtered = Vec::new();
    let rows = fixture
        .api
        .export_report_csv(fixture.config_id, Some(fixture.campus.dept_it.id), &mut filtered)
        .unwrap();
    assert_eq!(rows, 2);
}
