//! The dental-clinic schema and its bundled sample data. This module is
//! pure input metadata for the generic machinery; nothing in the core
//! knows these table names.

use crate::error::Result;
use crate::schema::table::{Column, DataKind, OnDelete, TableDefinition, Value, ValueConstraint};
use crate::schema::SchemaRegistry;
use crate::seeder::SeedDataset;

fn text(name: &str) -> Column {
    Column::new(name, DataKind::Text)
}

fn number(name: &str) -> Column {
    Column::new(name, DataKind::Number)
}

fn date(name: &str) -> Column {
    Column::new(name, DataKind::Date)
}

/// Build the full clinic registry: lookup tables, the staff hierarchy,
/// patients, and the appointment/treatment/billing records.
pub fn clinic_registry() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();

    registry.register(
        TableDefinition::new("Clinic")
            .column(text("ClinicID").not_null())
            .column(text("Name").not_null().unique())
            .column(text("Contact").unique())
            .column(text("Address").not_null().unique())
            .column(text("Operating_Hours").not_null())
            .key(&["ClinicID"]),
    )?;

    registry.register(
        TableDefinition::new("Staff_Role")
            .column(text("RoleID").not_null())
            .column(text("RoleName").not_null().unique())
            .key(&["RoleID"]),
    )?;

    registry.register(
        TableDefinition::new("Staff")
            .column(text("StaffID").not_null())
            .column(text("Name").not_null())
            .column(text("Contact").unique())
            .column(text("RoleID").not_null())
            .column(text("ClinicID").not_null())
            .key(&["StaffID"])
            .references("RoleID", "Staff_Role", "RoleID", OnDelete::Cascade)
            .references("ClinicID", "Clinic", "ClinicID", OnDelete::Cascade),
    )?;

    registry.register(
        TableDefinition::new("Dentist_Specialization")
            .column(text("SpecializationID").not_null())
            .column(text("SpecializationName").not_null().unique())
            .key(&["SpecializationID"]),
    )?;

    registry.register(
        TableDefinition::new("Dentist")
            .column(text("StaffID").not_null())
            .column(text("SpecializationID").not_null())
            .column(text("Schedule").not_null())
            .key(&["StaffID"])
            .references("StaffID", "Staff", "StaffID", OnDelete::Cascade)
            .references(
                "SpecializationID",
                "Dentist_Specialization",
                "SpecializationID",
                OnDelete::Cascade,
            ),
    )?;

    registry.register(
        TableDefinition::new("Receptionist")
            .column(text("StaffID").not_null())
            .column(text("Schedule").not_null())
            .key(&["StaffID"])
            .references("StaffID", "Staff", "StaffID", OnDelete::Cascade),
    )?;

    registry.register(
        TableDefinition::new("Patient")
            .column(text("PatientID").not_null())
            .column(text("Name").not_null())
            .column(number("Age").check(ValueConstraint::between(0.0, 120.0)))
            .column(text("Gender").check(ValueConstraint::one_of(&[
                "Male", "Female", "Other", "Unknown",
            ])))
            .column(text("Contact").unique())
            .column(text("Email").unique())
            .key(&["PatientID"]),
    )?;

    registry.register(
        TableDefinition::new("Appointment_Status")
            .column(text("StatusID").not_null())
            .column(text("StatusName").not_null().unique())
            .key(&["StatusID"]),
    )?;

    registry.register(
        TableDefinition::new("Appointment")
            .column(text("AppointmentID").not_null())
            .column(text("PatientID").not_null())
            .column(text("StaffID").not_null())
            .column(date("Appointment_Date").not_null())
            .column(text("Appointment_Time").not_null())
            .column(text("StatusID").not_null())
            .column(text("ReceptionistID"))
            .key(&["AppointmentID"])
            .references("PatientID", "Patient", "PatientID", OnDelete::Cascade)
            .references("StaffID", "Staff", "StaffID", OnDelete::Cascade)
            .references("StatusID", "Appointment_Status", "StatusID", OnDelete::Cascade)
            .references("ReceptionistID", "Receptionist", "StaffID", OnDelete::Cascade)
            .unique_together(&["PatientID", "StaffID", "Appointment_Date", "Appointment_Time"]),
    )?;

    registry.register(
        TableDefinition::new("Treatment_Type")
            .column(text("TreatmentTypeID").not_null())
            .column(text("TreatmentName").not_null().unique())
            .column(
                number("BasePrice")
                    .default_value(Value::Int(0))
                    .check(ValueConstraint::at_least(0.0)),
            )
            .key(&["TreatmentTypeID"]),
    )?;

    registry.register(
        TableDefinition::new("Treatment")
            .column(text("TreatmentID").not_null())
            .column(text("AppointmentID").not_null())
            .column(text("PatientID").not_null())
            .column(text("StaffID").not_null())
            .column(text("TreatmentTypeID").not_null())
            .column(text("Description"))
            .column(
                number("Cost")
                    .default_value(Value::Int(0))
                    .check(ValueConstraint::at_least(0.0)),
            )
            .key(&["TreatmentID"])
            .references("AppointmentID", "Appointment", "AppointmentID", OnDelete::Cascade)
            .references("PatientID", "Patient", "PatientID", OnDelete::Cascade)
            .references("StaffID", "Dentist", "StaffID", OnDelete::Cascade)
            .references(
                "TreatmentTypeID",
                "Treatment_Type",
                "TreatmentTypeID",
                OnDelete::Cascade,
            )
            .unique_together(&["AppointmentID", "TreatmentTypeID"]),
    )?;

    registry.register(
        TableDefinition::new("Medical_Record")
            .column(text("MedicalRecordID").not_null())
            .column(text("PatientID").not_null())
            .column(text("Medical_History"))
            .column(text("Diagnoses"))
            .column(text("Prescriptions"))
            .column(text("TreatmentID"))
            .column(text("AppointmentID"))
            .key(&["MedicalRecordID"])
            .references("PatientID", "Patient", "PatientID", OnDelete::Cascade)
            .references("TreatmentID", "Treatment", "TreatmentID", OnDelete::SetNull)
            .references("AppointmentID", "Appointment", "AppointmentID", OnDelete::SetNull)
            .unique_together(&["PatientID", "TreatmentID", "AppointmentID"]),
    )?;

    registry.register(
        TableDefinition::new("Billing_Status")
            .column(text("StatusID").not_null())
            .column(text("StatusName").not_null().unique())
            .key(&["StatusID"]),
    )?;

    registry.register(
        TableDefinition::new("Billing")
            .column(text("BillingID").not_null())
            .column(text("AppointmentID").not_null())
            .column(text("PatientID").not_null())
            .column(date("Billing_Date").not_null())
            .column(
                number("Amount")
                    .default_value(Value::Int(0))
                    .check(ValueConstraint::at_least(0.0)),
            )
            .column(text("ReceptionistID"))
            .column(text("StatusID").not_null())
            .key(&["BillingID"])
            .references("AppointmentID", "Appointment", "AppointmentID", OnDelete::Cascade)
            .references("PatientID", "Patient", "PatientID", OnDelete::Cascade)
            .references("ReceptionistID", "Receptionist", "StaffID", OnDelete::Cascade)
            .references("StatusID", "Billing_Status", "StatusID", OnDelete::Cascade)
            .unique_together(&["AppointmentID", "PatientID", "Billing_Date"]),
    )?;

    Ok(registry)
}

macro_rules! row {
    ($($v:expr),* $(,)?) => {
        vec![$(Value::from($v)),*]
    };
}

/// The bundled sample dataset: two clinics, three staff, three patients,
/// two appointments with their treatments, records and bills.
pub fn sample_dataset() -> SeedDataset {
    let mut dataset = SeedDataset::new();

    dataset.insert(
        "Staff_Role",
        vec![row!["R001", "Dentist"], row!["R002", "Receptionist"]],
    );
    dataset.insert(
        "Dentist_Specialization",
        vec![
            row!["SP001", "Orthodontics"],
            row!["SP002", "General Dentistry"],
            row!["SP003", "Cosmetic Dentistry"],
        ],
    );
    dataset.insert(
        "Appointment_Status",
        vec![
            row!["AS001", "Scheduled"],
            row!["AS002", "Completed"],
            row!["AS003", "Cancelled"],
            row!["AS004", "Pending"],
        ],
    );
    dataset.insert(
        "Treatment_Type",
        vec![
            row!["TT001", "Braces", 1500],
            row!["TT002", "Dental Filling", 200],
            row!["TT003", "Teeth Whitening", 300],
            row!["TT004", "Root Canal", 800],
        ],
    );
    dataset.insert(
        "Billing_Status",
        vec![
            row!["BS001", "Pending"],
            row!["BS002", "Paid"],
            row!["BS003", "Overdue"],
        ],
    );
    dataset.insert(
        "Clinic",
        vec![
            row!["C001", "Downtown Dental", "416-123-4567", "123 Main St", "9am-5pm"],
            row!["C002", "Riverside Clinic", "416-987-6543", "456 River Rd", "8am-6pm"],
        ],
    );
    dataset.insert(
        "Staff",
        vec![
            row!["S001", "Dr. John Doe", "111-222-4333", "R001", "C001"],
            row!["S002", "Emily Clark", "444-555-6666", "R002", "C001"],
            row!["S003", "Dr. Bob Wilson", "111-222-3333", "R001", "C001"],
        ],
    );
    dataset.insert(
        "Dentist",
        vec![
            row!["S001", "SP001", "Mon-Fri 9AM-5PM"],
            row!["S003", "SP002", "Mon-Fri 9AM-5PM"],
        ],
    );
    dataset.insert("Receptionist", vec![row!["S002", "Mon-Fri 9AM-5PM"]]);
    dataset.insert(
        "Patient",
        vec![
            row!["P001", "Alice Brown", 29, "Female", "777-888-9999", "alice.brown@email.com"],
            row!["P002", "Bob Smith", 45, "Male", "222-333-4444", "bob.smith@email.com"],
            row!["P003", "Billy Bob", 25, "Male", "416-111-2222", "billy.bob@email.com"],
        ],
    );
    dataset.insert(
        "Appointment",
        vec![
            row!["A001", "P001", "S001", "2024-10-01", "10:00AM", "AS001", "S002"],
            row!["A002", "P002", "S001", "2024-10-01", "10:00AM", "AS001", "S002"],
        ],
    );
    dataset.insert(
        "Treatment",
        vec![
            row!["T001", "A001", "P001", "S001", "TT001", "Orthodontic braces", 1500],
            row!["T002", "A002", "P002", "S001", "TT002", "Dental filling", 200],
        ],
    );
    dataset.insert(
        "Medical_Record",
        vec![
            row![
                "MR001",
                "P001",
                "No significant medical history",
                "Minor cavity detected",
                "Recommended oral hygiene",
                "T001",
                "A001"
            ],
            row![
                "MR002",
                "P002",
                "Previous dental work",
                "Tooth decay",
                "Prescribed antibiotics",
                "T002",
                "A002"
            ],
        ],
    );
    dataset.insert(
        "Billing",
        vec![
            row!["B001", "A001", "P001", "2024-10-01", 1500, "S002", "BS002"],
            row!["B002", "A002", "P002", "2024-10-01", 200, "S002", "BS001"],
        ],
    );

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_all_fourteen_tables() {
        let registry = clinic_registry().unwrap();
        assert_eq!(registry.len(), 14);
    }

    #[test]
    fn dependency_order_is_valid_for_the_clinic_schema() {
        let registry = clinic_registry().unwrap();
        let order = registry.dependency_order().unwrap();
        assert_eq!(order.len(), 14);

        let pos = |n: &str| order.iter().position(|t| t == n).unwrap();
        for table in registry.tables() {
            for fk in table.foreign_keys() {
                assert!(
                    pos(&fk.references_table) < pos(table.name()),
                    "{} must come before {}",
                    fk.references_table,
                    table.name()
                );
            }
        }
    }

    #[test]
    fn sample_rows_align_with_column_counts() {
        let registry = clinic_registry().unwrap();
        let dataset = sample_dataset();
        for table in registry.tables() {
            let rows = dataset
                .get(table.name())
                .unwrap_or_else(|| panic!("no sample data for {}", table.name()));
            for row in rows {
                assert_eq!(
                    row.len(),
                    table.columns().len(),
                    "arity mismatch in {}",
                    table.name()
                );
            }
        }
    }
}
