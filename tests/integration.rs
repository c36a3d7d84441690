//! Integration tests for the clinicdb CLI.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_clinicdb(args: &[&str], dir: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_clinicdb"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute clinicdb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let status = output.status.code().unwrap_or(1);

    (stdout, stderr, status)
}

#[test]
fn test_init_creates_database() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let (stdout, _stderr, status) = run_clinicdb(&["init"], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("create: ok"));
    assert!(dir.join("clinic.db").exists());
}

#[test]
fn test_tables_lists_dependency_order() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let (stdout, _, status) = run_clinicdb(&["tables"], dir);
    assert_eq!(status, 0);

    let order: Vec<&str> = stdout.lines().collect();
    assert_eq!(order.len(), 14);
    let pos = |n: &str| order.iter().position(|t| *t == n).unwrap();
    assert!(pos("Staff_Role") < pos("Staff"));
    assert!(pos("Clinic") < pos("Staff"));
    assert!(pos("Staff") < pos("Appointment"));
    assert!(pos("Appointment") < pos("Billing"));
}

#[test]
fn test_seed_and_list() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);
    let (stdout, _, status) = run_clinicdb(&["seed"], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("populate: ok"));

    let (stdout, _, status) = run_clinicdb(&["list", "Patient"], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("Alice Brown"));
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn test_columns_reports_live_order() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);
    let (stdout, _, status) = run_clinicdb(&["columns", "Staff"], dir);
    assert_eq!(status, 0);
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["StaffID", "Name", "Contact", "RoleID", "ClinicID"]
    );
}

#[test]
fn test_crud_round_trip() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);

    let (_stdout, _stderr, status) =
        run_clinicdb(&["insert", "Staff_Role", r#"["R003", "Hygienist"]"#], dir);
    assert_eq!(status, 0);

    let (_stdout, _stderr, status) =
        run_clinicdb(&["update", "Staff_Role", "R003", r#"["Dental Hygienist"]"#], dir);
    assert_eq!(status, 0);

    let (stdout, _, _) = run_clinicdb(&["list", "Staff_Role"], dir);
    assert!(stdout.contains("Dental Hygienist"));

    let (_stdout, _stderr, status) = run_clinicdb(&["delete", "Staff_Role", "R003"], dir);
    assert_eq!(status, 0);

    let (stdout, _, _) = run_clinicdb(&["list", "Staff_Role"], dir);
    assert!(!stdout.contains("Hygienist"));
}

#[test]
fn test_delete_cascades_through_staff() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);
    run_clinicdb(&["seed"], dir);

    // Deleting the Dentist role removes all dentists and, transitively,
    // their appointments and treatments.
    let (_stdout, _stderr, status) = run_clinicdb(&["delete", "Staff_Role", "R001"], dir);
    assert_eq!(status, 0);

    let (stdout, _, _) = run_clinicdb(&["list", "Dentist"], dir);
    assert!(stdout.trim().is_empty());
    let (stdout, _, _) = run_clinicdb(&["list", "Appointment"], dir);
    assert!(stdout.trim().is_empty());

    // The receptionist role survives untouched
    let (stdout, _, _) = run_clinicdb(&["list", "Staff"], dir);
    assert!(stdout.contains("Emily Clark"));
}

#[test]
fn test_init_twice_reports_errors_but_exits_cleanly() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);
    let (stdout, _, status) = run_clinicdb(&["init"], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("completed with errors"));

    // And the database still works
    let (_stdout, _stderr, status) = run_clinicdb(&["seed"], dir);
    assert_eq!(status, 0);
}

#[test]
fn test_delete_missing_key_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);
    let (_stdout, stderr, status) = run_clinicdb(&["delete", "Staff_Role", "R999"], dir);
    assert_ne!(status, 0);
    assert!(stderr.contains("No row"));
}

#[test]
fn test_unknown_table_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);
    let (_stdout, stderr, status) = run_clinicdb(&["list", "Nope"], dir);
    assert_ne!(status, 0);
    assert!(stderr.contains("Unknown table"));
}

#[test]
fn test_reset_rebuilds_and_reseeds() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    run_clinicdb(&["init"], dir);
    run_clinicdb(&["seed"], dir);
    run_clinicdb(&["delete", "Staff_Role", "R001"], dir);

    let (stdout, _, status) = run_clinicdb(&["reset"], dir);
    assert_eq!(status, 0);
    assert!(stdout.contains("populate: ok"));

    let (stdout, _, _) = run_clinicdb(&["list", "Dentist"], dir);
    assert_eq!(stdout.lines().count(), 2);
}
