//! Synthesizer Test Cases
//!
//! Reproducibility, identity and distribution properties of the simulated
//! employee dataset.

use chrono::NaiveDate;
use hr_analytics::columns::{date_values, i64_values, str_values};
use hr_analytics::ingestion::write_csv;
use hr_analytics::schema::*;
use hr_analytics::synthesizer::synthesize_as_of;
use hr_analytics::{synthesize, AnalyticsError};
use std::collections::HashSet;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
}

#[test]
fn test_same_seed_same_table() {
    println!("\n🧪 Testing synthesizer reproducibility\n");

    for (seed, rows) in [(42u64, 5usize), (7, 1), (123, 400)] {
        let first = synthesize_as_of(seed, rows, today()).unwrap();
        let second = synthesize_as_of(seed, rows, today()).unwrap();
        assert!(first.equals(&second), "seed {} rows {} diverged", seed, rows);
    }

    let a = synthesize_as_of(1, 50, today()).unwrap();
    let b = synthesize_as_of(2, 50, today()).unwrap();
    assert!(!a.equals(&b));

    println!("✅ Test PASSED: identical seeds give identical tables");
}

#[test]
fn test_seed_42_five_rows_golden_csv() {
    let temp_dir = TempDir::new().unwrap();
    let first_path = temp_dir.path().join("first.csv");
    let second_path = temp_dir.path().join("second.csv");

    let mut first = synthesize_as_of(42, 5, today()).unwrap();
    let mut second = synthesize_as_of(42, 5, today()).unwrap();
    write_csv(&mut first, &first_path).unwrap();
    write_csv(&mut second, &second_path).unwrap();

    let first_bytes = std::fs::read(&first_path).unwrap();
    let second_bytes = std::fs::read(&second_path).unwrap();
    assert_eq!(first_bytes, second_bytes);

    let text = String::from_utf8(first_bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "EmployeeID,Name,Department,Role,HireDate,Salary,PerformanceRating,\
         EngagementScore,Attrition,Gender,TenureYears"
    );
    let ids: Vec<&str> = lines.map(|l| l.split(',').next().unwrap()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_seed_42_five_rows_pinned_values() {
    println!("\n🧪 Testing pinned seed=42 output (StdRng, 5 rows)\n");

    let df = synthesize_as_of(42, 5, today()).unwrap();
    let text = |column: &str| -> Vec<String> {
        str_values(&df, column)
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    };
    let ints = |column: &str| -> Vec<i64> {
        i64_values(&df, column)
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    };

    assert_eq!(
        text(NAME),
        vec!["Kevin Taylor", "Ivan Smith", "Kevin Thomas", "Eve Smith", "Kevin Jones"]
    );
    assert_eq!(
        text(DEPARTMENT),
        vec!["Operations", "HR", "Engineering", "Marketing", "Marketing"]
    );
    assert_eq!(
        text(ROLE),
        vec!["Senior Associate", "Associate", "Analyst", "Associate", "Specialist"]
    );
    let hires: Vec<NaiveDate> = date_values(&df, HIRE_DATE)
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    assert_eq!(
        hires,
        vec![
            date(2021, 1, 30),
            date(2016, 7, 18),
            date(2019, 1, 14),
            date(2015, 6, 20),
            date(2017, 12, 30),
        ]
    );
    assert_eq!(ints(SALARY), vec![92614, 81311, 67357, 34557, 40475]);
    assert_eq!(ints(PERFORMANCE_RATING), vec![3, 5, 5, 2, 2]);
    assert_eq!(ints(ENGAGEMENT_SCORE), vec![85, 79, 78, 81, 67]);
    assert_eq!(ints(ATTRITION), vec![0, 0, 0, 0, 1]);
    assert_eq!(text(GENDER), vec!["Male", "Female", "Female", "Female", "Female"]);

    println!("✅ Test PASSED: draw order matches the pinned stream");
}

#[test]
fn test_employee_ids_contiguous() {
    let df = synthesize_as_of(9, 1000, today()).unwrap();
    let ids: Vec<i64> = i64_values(&df, EMPLOYEE_ID)
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(ids, (1..=1000).collect::<Vec<i64>>());
}

#[test]
fn test_categoricals_from_closed_sets() {
    let df = synthesize_as_of(5, 2000, today()).unwrap();

    let check = |column: &str, allowed: &[&str]| {
        let seen: HashSet<String> = str_values(&df, column)
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        for value in &seen {
            assert!(allowed.contains(&value.as_str()), "{} has {}", column, value);
        }
        seen.len()
    };

    assert_eq!(check(DEPARTMENT, &DEPARTMENTS), DEPARTMENTS.len());
    assert_eq!(check(ROLE, &ROLES), ROLES.len());
    assert_eq!(check(GENDER, &GENDERS), GENDERS.len());
}

#[test]
fn test_attrition_segments_at_scale() {
    println!("\n🧪 Testing segment-specific attrition over 100000 rows\n");

    let df = synthesize_as_of(2024, 100_000, today()).unwrap();
    let departments = str_values(&df, DEPARTMENT).unwrap();
    let attrition = i64_values(&df, ATTRITION).unwrap();
    let engagement = i64_values(&df, ENGAGEMENT_SCORE).unwrap();

    let (mut eng_total, mut eng_left, mut other_total, mut other_left) = (0usize, 0usize, 0usize, 0usize);
    for ((department, flag), score) in departments.iter().zip(&attrition).zip(&engagement) {
        let flag = flag.unwrap();
        if flag == 1 {
            assert!((40..70).contains(&score.unwrap()));
        }
        if department.as_deref() == Some(ENGINEERING) {
            eng_total += 1;
            eng_left += flag as usize;
        } else {
            other_total += 1;
            other_left += flag as usize;
        }
    }

    let eng_rate = eng_left as f64 / eng_total as f64;
    let other_rate = other_left as f64 / other_total as f64;
    let overall_rate = (eng_left + other_left) as f64 / 100_000.0;
    println!("  Engineering rate: {:.4}", eng_rate);
    println!("  Other rate:       {:.4}", other_rate);
    println!("  Overall rate:     {:.4}", overall_rate);

    assert!((eng_rate - 0.3).abs() < 0.02);
    assert!((other_rate - 0.1).abs() < 0.01);
    let expected_overall = (eng_total as f64 * 0.3 + other_total as f64 * 0.1) / 100_000.0;
    assert!((overall_rate - expected_overall).abs() < 0.01);

    println!("✅ Test PASSED: Engineering attrition re-drawn at 30%");
}

#[test]
fn test_invalid_row_count() {
    assert!(matches!(
        synthesize(42, 0),
        Err(AnalyticsError::InvalidArgument(_))
    ));
}

#[test]
fn test_unallocatable_row_count() {
    assert!(matches!(
        synthesize(42, usize::MAX),
        Err(AnalyticsError::ResourceExhausted(_))
    ));
}
