//! # Seed Data Generator
//!
//! Populates the database with a demo school for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./school_dev.db with 4 classes (default)
//! cargo run -p school-db --bin seed
//!
//! # More classes
//! cargo run -p school-db --bin seed -- --classes 8
//!
//! # Specify database path
//! cargo run -p school-db --bin seed -- --db ./data/school.db
//! ```
//!
//! ## Generated Data
//! - One school ("Green Valley High")
//! - Classes `1A`, `2A`, ... each with three subjects
//! - One class test per subject
//! - One semester exam per class (one paper per subject)
//! - A month of expenses across common categories

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use school_core::contracts::class::CreateClass;
use school_core::contracts::exam::{CreateClassTest, CreateSemExam, ExamEntryInput};
use school_core::contracts::expense::CreateExpense;
use school_core::contracts::school::CreateSchool;
use school_core::types::new_id;
use school_core::Money;
use school_db::{Database, DbConfig};
use std::env;

/// Expense categories with a base amount in minor units.
const EXPENSES: &[(&str, &str, i64)] = &[
    ("Stationery", "Chalk, dusters and registers", 3_499),
    ("Utilities", "Electricity bill", 182_000),
    ("Transport", "Bus fuel", 95_050),
    ("Maintenance", "Classroom fan repair", 12_500),
    ("Events", "Sports day refreshments", 45_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut classes: usize = 4;
    let mut db_path = String::from("./school_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--classes" | "-c" => {
                if i + 1 < args.len() {
                    classes = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("School Desk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --classes <N>  Number of classes to generate (default: 4)");
                println!("  -d, --db <PATH>    Database file path (default: ./school_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 School Desk Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Classes:  {}", classes);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.schools().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} schools", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let school = db
        .schools()
        .insert(CreateSchool {
            name: "Green Valley High".into(),
            address: "12 Hill Road, Pune".into(),
            phone: "+919876543210".into(),
            email: "office@greenvalley.edu".into(),
            logo: None,
        })
        .await?;
    println!("✓ School {} ({})", school.name, school.id);

    let term_start = NaiveDate::from_ymd_opt(2024, 7, 1).ok_or("invalid term start")?;
    let exam_start = NaiveDate::from_ymd_opt(2024, 11, 4).ok_or("invalid exam start")?;
    let morning = NaiveTime::from_hms_opt(9, 30, 0).ok_or("invalid start time")?;
    let noon = NaiveTime::from_hms_opt(12, 30, 0).ok_or("invalid end time")?;

    let started = std::time::Instant::now();
    let mut tests = 0;

    for grade in 1..=classes {
        let subjects: Vec<String> = (0..3).map(|_| new_id()).collect();

        let class = db
            .classes()
            .insert(CreateClass {
                class_name: format!("{}A", grade),
                class_room: Some(format!("R-{:02}", grade)),
                school_id: school.id.clone(),
                class_teacher_id: new_id(),
                subjects: subjects.clone(),
                is_active: None,
            })
            .await?;

        for (n, subject_id) in subjects.iter().enumerate() {
            db.class_tests()
                .insert(CreateClassTest {
                    subject_id: subject_id.clone(),
                    class_id: class.id.clone(),
                    school_id: school.id.clone(),
                    date: term_start + Duration::weeks(n as i64 + 2),
                    total_mark: 25,
                    description: Some(format!("Unit test {}", n + 1)),
                    is_active: None,
                })
                .await?;
            tests += 1;
        }

        let papers = subjects
            .iter()
            .enumerate()
            .map(|(n, subject_id)| ExamEntryInput {
                subject_id: subject_id.clone(),
                date: exam_start + Duration::days(2 * n as i64),
                start_time: morning,
                end_time: noon,
                description: None,
            })
            .collect();

        db.sem_exams()
            .insert(CreateSemExam {
                school_id: school.id.clone(),
                class_id: class.id.clone(),
                exams: papers,
                is_active: None,
            })
            .await?;

        println!("  Class {} with {} subjects", class.class_name, subjects.len());
    }

    let admin = new_id();
    for (n, (category, description, cents)) in EXPENSES.iter().enumerate() {
        db.expenses()
            .insert(CreateExpense {
                description: description.to_string(),
                amount: Money::from_cents(*cents),
                date: term_start + Duration::days(n as i64 * 6),
                school_id: school.id.clone(),
                category: category.to_string(),
                created_by: admin.clone(),
                is_active: None,
            })
            .await?;
    }

    println!();
    println!(
        "✓ Seeded {} classes, {} class tests, {} semester exams, {} expenses in {:?}",
        db.classes().count().await?,
        tests,
        db.sem_exams().count().await?,
        db.expenses().count().await?,
        started.elapsed()
    );
    println!("  Generated at {}", Utc::now().to_rfc3339());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
