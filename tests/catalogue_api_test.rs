// ==========================================
// 基础数据 API 集成测试
// ==========================================
// 测试目标: 系数区间校验 / 学位系数唯一 / 自动编码 / 系数修改需重算才生效
// ==========================================

mod test_helpers;
#[path = "helpers/mock_config.rs"]
mod mock_config;

use mock_config::MockConfig;
use rust_decimal::Decimal;
use std::sync::Arc;
use teaching_payroll::api::{ApiError, CatalogueApi, SalaryApi};
use teaching_payroll::domain::academic::{NewCourse, NewTeacher};
use teaching_payroll::logging;
use test_helpers::*;

fn new_course(name: &str, lessons: u32, coefficient: Option<Decimal>) -> NewCourse {
    NewCourse {
        code: None,
        name: name.to_string(),
        credits: 2,
        lessons,
        course_coefficient: coefficient,
        department_id: None,
    }
}

#[test]
fn test_create_course_validation_and_codes() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_conn, repos) = open_repos(&db_path);
    let api = CatalogueApi::new(&repos);

    let first = api.create_course(new_course("高等数学", 64, None)).unwrap();
    assert_eq!(first.code, "CS001");
    assert_eq!(first.course_coefficient, Decimal::ONE);

    let second = api
        .create_course(new_course("大学物理", 48, Some(dec1(12))))
        .unwrap();
    assert_eq!(second.code, "CS002");
    assert_eq!(second.course_coefficient, dec1(12));

    for lessons in [0, 101] {
        let err = api.create_course(new_course("无效课程", lessons, None)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
    let err = api
        .create_course(new_course("无效课程", 10, Some(dec1(16))))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    // 越界原值不因舍入而被放行
    for raw in [Decimal::new(95, 2), Decimal::new(154, 2)] {
        let err = api
            .create_course(new_course("无效课程", 10, Some(raw)))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
    let err = api
        .update_course_coefficient(first.id, Decimal::new(95, 2))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let rounded = api
        .create_course(new_course("线性代数", 32, Some(Decimal::new(146, 2))))
        .unwrap();
    assert_eq!(rounded.code, "CS003");
    assert_eq!(rounded.course_coefficient, dec1(15));
}

#[test]
fn test_degree_factor_must_be_unique() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_conn, repos) = open_repos(&db_path);
    let api = CatalogueApi::new(&repos);

    let master = api.create_degree("硕士", Decimal::new(15, 1)).unwrap();
    let doctor = api.create_degree("博士", Decimal::new(20, 1)).unwrap();

    // 1.50 与 1.5 数值相同
    let err = api.create_degree("工程硕士", Decimal::new(150, 2)).unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
    // 舍入到 2 位后重复同样拒绝
    let err = api.create_degree("工程硕士", Decimal::new(1504, 3)).unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

    let err = api
        .update_degree_factor(doctor.id, Decimal::new(15, 1))
        .unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
    let unchanged = repos.academic_repo.find_degree(doctor.id).unwrap().unwrap();
    assert_eq!(unchanged.base_salary_factor, dec1(20));

    // 改为自身当前系数不算重复
    let same = api
        .update_degree_factor(master.id, Decimal::new(150, 2))
        .unwrap();
    assert_eq!(same.base_salary_factor, dec1(15));

    let moved = api
        .update_degree_factor(master.id, Decimal::new(175, 2))
        .unwrap();
    assert_eq!(moved.base_salary_factor, Decimal::new(175, 2));
    let reused = api.create_degree("工程硕士", Decimal::new(15, 1)).unwrap();
    assert_eq!(reused.base_salary_factor, dec1(15));
    assert_eq!(repos.academic_repo.list_degrees().unwrap().len(), 3);
}

#[test]
fn test_degree_and_teacher_validation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_conn, repos) = open_repos(&db_path);
    let api = CatalogueApi::new(&repos);

    let err = api.create_degree("无效", Decimal::new(51, 1)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let degree = api.create_degree("硕士", Decimal::new(15, 1)).unwrap();
    assert!(api.create_degree("硕士", Decimal::new(15, 1)).is_err());

    let err = api
        .create_teacher(NewTeacher {
            full_name: "郑十".to_string(),
            date_of_birth: None,
            phone: None,
            email: None,
            degree_id: Some(9999),
            department_id: None,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let teacher = api
        .create_teacher(NewTeacher {
            full_name: " 郑十 ".to_string(),
            date_of_birth: None,
            phone: None,
            email: None,
            degree_id: Some(degree.id),
            department_id: None,
        })
        .unwrap();
    assert_eq!(teacher.full_name, "郑十");
    assert_eq!(teacher.degree_id, Some(degree.id));
}

#[test]
fn test_coefficient_change_applies_on_recalculation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_conn, repos) = open_repos(&db_path);
    let campus = seed_campus(&repos);
    let catalogue = CatalogueApi::new(&repos);
    let salary_api = SalaryApi::new(&repos, Arc::new(MockConfig::default()));

    let degree = catalogue.create_degree("学士", Decimal::ONE).unwrap();
    let teacher = insert_teacher(&repos, "冯一", Some(degree.id), None);
    let course = catalogue.create_course(new_course("体育", 10, None)).unwrap();
    insert_classroom(&repos, "体育 N01", campus.semester_1.id, Some(course.id), Some(teacher.id), 45);

    let config = salary_api
        .create_config(campus.semester_1.id, Decimal::from(100))
        .unwrap();
    salary_api.calculate(config.id).unwrap();

    let updated = catalogue
        .update_course_coefficient(course.id, Decimal::new(15, 1))
        .unwrap();
    assert_eq!(updated.course_coefficient, Decimal::new(15, 1));
    let report = salary_api.report(config.id, None).unwrap();
    assert_eq!(report.totals.total_salary, Decimal::from(1_000));

    salary_api.calculate(config.id).unwrap();
    let report = salary_api.report(config.id, None).unwrap();
    assert_eq!(report.totals.total_salary, Decimal::from(1_500));

    let err = catalogue
        .update_degree_factor(9999, Decimal::ONE)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
