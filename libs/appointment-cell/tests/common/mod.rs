// libs/appointment-cell/tests/common/mod.rs
//
// Fixtures shared by the appointment-cell test binaries.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use appointment_cell::models::*;
use appointment_cell::services::{clinic_offset, SchedulingContext, ServiceCatalog};

pub fn ts(value: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(value).unwrap()
}

pub fn fixed_now() -> DateTime<Utc> {
    "2024-02-20T08:00:00Z".parse().unwrap()
}

fn entry(id: &str, label: &str, minutes: u32, color: &str) -> ServiceCatalogEntry {
    ServiceCatalogEntry {
        id: id.to_string(),
        label: label.to_string(),
        default_duration_minutes: minutes,
        color: color.to_string(),
    }
}

/// follow_up = 20 min, consultation = 30 min, therapy = 45 min.
pub fn catalog_entries() -> Vec<ServiceCatalogEntry> {
    vec![
        entry("follow_up", "Follow-up", 20, "#16a34a"),
        entry("consultation", "Consultation", 30, "#4f46e5"),
        entry("therapy", "Therapy session", 45, "#ea580c"),
    ]
}

pub fn catalog() -> ServiceCatalog {
    ServiceCatalog::new(catalog_entries()).unwrap()
}

/// Default opening hours (Mon-Fri 09:00-18:00) plus the test catalog.
pub fn context() -> SchedulingContext {
    SchedulingContext::new(WorkingHoursConfig::default(), catalog_entries()).unwrap()
}

/// `context()` for a clinic `minutes` east of UTC.
pub fn context_at_offset(minutes: i32) -> SchedulingContext {
    context().with_clinic_offset(clinic_offset(minutes).unwrap())
}

pub fn appointment(practitioner_id: Uuid, start: &str, end: &str) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_id: Some(Uuid::new_v4()),
        practitioner_id,
        start: ts(start),
        end: ts(end),
        all_day: false,
        service_type: ServiceType::service("consultation"),
        status: AppointmentStatus::Scheduled,
        notes: None,
        block_category: None,
        cancel_reason: None,
        delete_reason: None,
        deleted: false,
        deleted_at: None,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

pub fn with_status(mut appointment: Appointment, status: AppointmentStatus) -> Appointment {
    appointment.status = status;
    appointment
}

pub fn patient_draft(practitioner_id: Uuid, start: &str, end: &str) -> AppointmentDraft {
    AppointmentDraft {
        appointment_id: None,
        patient_id: Some(Uuid::new_v4()),
        practitioner_id: Some(practitioner_id),
        start: ts(start),
        end: ts(end),
        service_type: ServiceType::service("consultation"),
        all_day: false,
        block_category: None,
        notes: None,
        duration_pinned: true,
    }
}

pub fn closure_draft(
    practitioner_id: Uuid,
    start: &str,
    end: &str,
    category: BlockCategory,
) -> AppointmentDraft {
    AppointmentDraft {
        appointment_id: None,
        patient_id: None,
        practitioner_id: Some(practitioner_id),
        start: ts(start),
        end: ts(end),
        service_type: ServiceType::Blocked,
        all_day: false,
        block_category: Some(category),
        notes: Some("Team meeting".to_string()),
        duration_pinned: true,
    }
}
