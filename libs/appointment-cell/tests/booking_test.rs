// libs/appointment-cell/tests/booking_test.rs
//
// End-to-end scheduling flows against the in-memory store.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use appointment_cell::models::*;
use appointment_cell::services::{
    AppointmentStore, InMemoryAppointmentStore, SchedulingService, MAX_SEARCH_DAYS,
};

mod common;
use common::{appointment, closure_draft, context, context_at_offset, fixed_now, patient_draft, ts};

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

struct TestSetup {
    store: Arc<InMemoryAppointmentStore>,
    service: SchedulingService,
    practitioner_id: Uuid,
}

impl TestSetup {
    fn new() -> Self {
        Self::with_appointments(vec![])
    }

    fn with_appointments(appointments: Vec<Appointment>) -> Self {
        let store = Arc::new(InMemoryAppointmentStore::with_appointments(appointments));
        let service = SchedulingService::new(store.clone());

        Self {
            store,
            service,
            practitioner_id: Uuid::new_v4(),
        }
    }

    async fn book(&self, start: &str, end: &str) -> Appointment {
        let draft = patient_draft(self.practitioner_id, start, end);
        self.service
            .commit_appointment(&context(), &draft, false)
            .await
            .unwrap()
    }
}

// ==============================================================================
// TWO-PHASE BOOKING
// ==============================================================================

#[tokio::test]
async fn proposal_reports_conflicts_without_writing() {
    let setup = TestSetup::new();
    let existing = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let draft = patient_draft(setup.practitioner_id, "2024-03-04T10:15:00Z", "2024-03-04T10:45:00Z");
    let proposal = setup.service.propose_appointment(&context(), &draft).await.unwrap();

    assert!(proposal.requires_confirmation());
    assert_eq!(proposal.warnings.len(), 1);
    assert_eq!(proposal.warnings[0].appointment_id, existing.id);
    assert_eq!(proposal.status, AppointmentStatus::Scheduled);
    assert_eq!(proposal.interval.start, ts("2024-03-04T10:15:00Z"));

    let stored = setup
        .store
        .list(None, ts("2024-03-04T00:00:00Z"), ts("2024-03-05T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn conflicting_commit_needs_confirmation() {
    let setup = TestSetup::new();
    setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;
    let draft = patient_draft(setup.practitioner_id, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z");

    let rejected = setup.service.commit_appointment(&context(), &draft, false).await;
    assert_matches!(rejected, Err(SchedulingError::ConflictDetected(warnings)) if warnings.len() == 1);

    let forced = setup.service.commit_appointment(&context(), &draft, true).await.unwrap();
    assert_eq!(forced.status, AppointmentStatus::Scheduled);
    assert_eq!(forced.patient_id, draft.patient_id);
}

#[tokio::test]
async fn adjacent_bookings_commit_without_confirmation() {
    let setup = TestSetup::new();
    setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let next = setup.book("2024-03-04T10:30:00Z", "2024-03-04T11:00:00Z").await;

    assert_eq!(next.start, ts("2024-03-04T10:30:00Z"));
}

#[tokio::test]
async fn booking_outside_working_hours_is_rejected() {
    let setup = TestSetup::new();
    let saturday = patient_draft(setup.practitioner_id, "2024-03-02T10:00:00Z", "2024-03-02T10:30:00Z");

    assert_matches!(
        setup.service.commit_appointment(&context(), &saturday, true).await,
        Err(SchedulingError::OutsideWorkingHours { .. })
    );
    assert_matches!(
        setup.service.propose_appointment(&context(), &saturday).await,
        Err(SchedulingError::OutsideWorkingHours { .. })
    );
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_store() {
    let setup = TestSetup::new();
    let mut draft = patient_draft(setup.practitioner_id, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z");
    draft.patient_id = None;

    assert_eq!(
        setup.service.commit_appointment(&context(), &draft, false).await,
        Err(SchedulingError::Validation(ValidationError::MissingPatient))
    );

    let inverted = patient_draft(setup.practitioner_id, "2024-03-04T10:30:00Z", "2024-03-04T10:00:00Z");
    assert_matches!(
        setup.service.commit_appointment(&context(), &inverted, false).await,
        Err(SchedulingError::Validation(ValidationError::InvalidInterval { .. }))
    );

    let stored = setup
        .store
        .list(None, ts("2024-03-04T00:00:00Z"), ts("2024-03-05T00:00:00Z"))
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn all_day_closure_can_cover_a_closed_day() {
    let setup = TestSetup::new();
    let mut draft = closure_draft(
        setup.practitioner_id,
        "2024-03-02T08:00:00Z",
        "2024-03-02T08:00:00Z",
        BlockCategory::Leave,
    );
    draft.all_day = true;

    let closure = setup.service.commit_appointment(&context(), &draft, false).await.unwrap();

    assert_eq!(closure.status, AppointmentStatus::Blocked);
    assert!(closure.all_day);
    assert_eq!(closure.start, ts("2024-03-02T00:00:00Z"));
    assert_eq!(closure.end, ts("2024-03-02T23:59:59Z"));
}

#[tokio::test]
async fn closure_over_booked_slots_warns_like_any_booking() {
    let setup = TestSetup::new();
    setup.book("2024-03-04T12:00:00Z", "2024-03-04T12:30:00Z").await;
    let draft = closure_draft(
        setup.practitioner_id,
        "2024-03-04T11:00:00Z",
        "2024-03-04T13:00:00Z",
        BlockCategory::Meeting,
    );

    let proposal = setup.service.propose_appointment(&context(), &draft).await.unwrap();

    assert_eq!(proposal.status, AppointmentStatus::Blocked);
    assert_eq!(proposal.warnings.len(), 1);
}

#[tokio::test]
async fn concurrent_commits_for_one_slot_are_serialized() {
    let setup = TestSetup::new();
    let first = patient_draft(setup.practitioner_id, "2024-03-04T14:00:00Z", "2024-03-04T14:30:00Z");
    let second = patient_draft(setup.practitioner_id, "2024-03-04T14:15:00Z", "2024-03-04T14:45:00Z");
    let ctx = context();

    let (a, b) = tokio::join!(
        setup.service.commit_appointment(&ctx, &first, false),
        setup.service.commit_appointment(&ctx, &second, false),
    );

    let committed = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(committed, 1);
    assert!(matches!(a, Err(SchedulingError::ConflictDetected(_))) || matches!(b, Err(SchedulingError::ConflictDetected(_))));
}

// ==============================================================================
// UPDATES
// ==============================================================================

#[tokio::test]
async fn rescheduling_into_a_booked_slot_needs_confirmation() {
    let setup = TestSetup::new();
    setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;
    let moving = setup.book("2024-03-04T11:00:00Z", "2024-03-04T11:30:00Z").await;

    let patch = AppointmentPatch {
        start: Some(ts("2024-03-04T10:15:00Z")),
        end: Some(ts("2024-03-04T10:45:00Z")),
        ..Default::default()
    };

    assert_matches!(
        setup.service.update_appointment(&context(), moving.id, &patch, false).await,
        Err(SchedulingError::ConflictDetected(_))
    );

    let scheduled = setup
        .service
        .update_appointment(&context(), moving.id, &patch, true)
        .await
        .unwrap();
    assert_eq!(scheduled.appointment.start, ts("2024-03-04T10:15:00Z"));
    assert_eq!(scheduled.appointment.end, ts("2024-03-04T10:45:00Z"));
    assert_eq!(scheduled.warnings.len(), 1);
}

#[tokio::test]
async fn rescheduling_out_of_hours_is_rejected() {
    let setup = TestSetup::new();
    let booked = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let patch = AppointmentPatch {
        start: Some(ts("2024-03-04T19:00:00Z")),
        end: Some(ts("2024-03-04T19:30:00Z")),
        ..Default::default()
    };

    assert_matches!(
        setup.service.update_appointment(&context(), booked.id, &patch, true).await,
        Err(SchedulingError::OutsideWorkingHours { .. })
    );
}

#[tokio::test]
async fn status_changes_warn_but_are_never_blocked() {
    let practitioner = Uuid::new_v4();
    let first = appointment(practitioner, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z");
    let double_booked = appointment(practitioner, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z");
    let setup = TestSetup::with_appointments(vec![first.clone(), double_booked]);

    let patch = AppointmentPatch {
        status: Some(AppointmentStatus::Confirmed),
        ..Default::default()
    };
    let scheduled = setup
        .service
        .update_appointment(&context(), first.id, &patch, false)
        .await
        .unwrap();

    assert_eq!(scheduled.appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(scheduled.warnings.len(), 1);
}

#[tokio::test]
async fn cancelled_appointment_frees_its_slot() {
    let setup = TestSetup::new();
    let booked = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let no_reason = AppointmentPatch {
        status: Some(AppointmentStatus::Cancelled),
        ..Default::default()
    };
    assert_eq!(
        setup.service.update_appointment(&context(), booked.id, &no_reason, false).await.map(|s| s.warnings),
        Err(SchedulingError::Validation(ValidationError::MissingCancelReason))
    );

    let with_reason = AppointmentPatch {
        status: Some(AppointmentStatus::Cancelled),
        cancel_reason: Some(CancelReason::Timing),
        ..Default::default()
    };
    let cancelled = setup
        .service
        .update_appointment(&context(), booked.id, &with_reason, false)
        .await
        .unwrap();
    assert_eq!(cancelled.appointment.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.appointment.cancel_reason, Some(CancelReason::Timing));
    assert!(cancelled.warnings.is_empty());

    let draft = patient_draft(setup.practitioner_id, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z");
    let proposal = setup.service.propose_appointment(&context(), &draft).await.unwrap();
    assert!(proposal.warnings.is_empty());
}

#[tokio::test]
async fn stale_patch_is_rejected() {
    let practitioner = Uuid::new_v4();
    let seeded = appointment(practitioner, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z");
    let setup = TestSetup::with_appointments(vec![seeded.clone()]);

    let first = AppointmentPatch {
        notes: Some("Bring lab results".to_string()),
        expected_updated_at: Some(fixed_now()),
        ..Default::default()
    };
    let updated = setup
        .service
        .update_appointment(&context(), seeded.id, &first, false)
        .await
        .unwrap();
    assert_ne!(updated.appointment.updated_at, fixed_now());

    let second = AppointmentPatch {
        notes: Some("Fasting required".to_string()),
        expected_updated_at: Some(fixed_now()),
        ..Default::default()
    };
    assert_eq!(
        setup.service.update_appointment(&context(), seeded.id, &second, false).await.map(|s| s.warnings),
        Err(SchedulingError::StaleWrite { id: seeded.id })
    );
}

#[tokio::test]
async fn service_change_keeps_the_booked_interval() {
    let setup = TestSetup::new();
    let booked = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let patch = AppointmentPatch {
        service_type: Some(ServiceType::service("therapy")),
        ..Default::default()
    };
    let scheduled = setup
        .service
        .update_appointment(&context(), booked.id, &patch, false)
        .await
        .unwrap();

    assert_eq!(scheduled.appointment.service_type, ServiceType::service("therapy"));
    assert_eq!(scheduled.appointment.end, ts("2024-03-04T10:30:00Z"));
}

#[tokio::test]
async fn patient_appointment_cannot_become_a_closure() {
    let setup = TestSetup::new();
    let booked = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let patch = AppointmentPatch {
        service_type: Some(ServiceType::Blocked),
        ..Default::default()
    };

    assert_matches!(
        setup.service.update_appointment(&context(), booked.id, &patch, false).await,
        Err(SchedulingError::InvalidStatusTransition {
            from: AppointmentStatus::Scheduled,
            to: AppointmentStatus::Blocked
        })
    );
}

#[tokio::test]
async fn unknown_appointment_is_not_found() {
    let setup = TestSetup::new();
    let id = Uuid::new_v4();

    assert_eq!(
        setup
            .service
            .update_appointment(&context(), id, &AppointmentPatch::default(), false)
            .await
            .map(|s| s.warnings),
        Err(SchedulingError::NotFound(id))
    );
    assert_eq!(
        setup.service.delete_appointment(id, "Cleanup").await,
        Err(SchedulingError::NotFound(id))
    );
}

#[tokio::test]
async fn closure_category_changes_once_the_patient_is_unlinked() {
    let setup = TestSetup::new();
    let mut surgery = closure_draft(
        setup.practitioner_id,
        "2024-03-04T10:00:00Z",
        "2024-03-04T12:00:00Z",
        BlockCategory::Surgery,
    );
    surgery.patient_id = Some(Uuid::new_v4());
    let booked = setup
        .service
        .commit_appointment(&context(), &surgery, false)
        .await
        .unwrap();

    let keep_patient = AppointmentPatch {
        block_category: Some(BlockCategory::Meeting),
        ..Default::default()
    };
    assert_eq!(
        setup.service.update_appointment(&context(), booked.id, &keep_patient, false).await.map(|s| s.warnings),
        Err(SchedulingError::Validation(ValidationError::PatientNotAllowedOnBlock(BlockCategory::Meeting)))
    );

    let unlink = AppointmentPatch {
        block_category: Some(BlockCategory::Meeting),
        patient_id: Some(None),
        ..Default::default()
    };
    let scheduled = setup
        .service
        .update_appointment(&context(), booked.id, &unlink, false)
        .await
        .unwrap();
    assert_eq!(scheduled.appointment.block_category, Some(BlockCategory::Meeting));
    assert_eq!(scheduled.appointment.patient_id, None);
    assert_eq!(scheduled.appointment.status, AppointmentStatus::Blocked);
}

#[tokio::test]
async fn patient_appointment_takes_no_closure_category() {
    let setup = TestSetup::new();
    let booked = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let patch = AppointmentPatch {
        block_category: Some(BlockCategory::Leave),
        ..Default::default()
    };

    assert_eq!(
        setup.service.update_appointment(&context(), booked.id, &patch, false).await.map(|s| s.warnings),
        Err(SchedulingError::Validation(ValidationError::BlockCategoryRequiresBlock))
    );
}

#[tokio::test]
async fn cancel_reason_needs_a_cancelled_appointment() {
    let setup = TestSetup::new();
    let booked = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    let stray_reason = AppointmentPatch {
        cancel_reason: Some(CancelReason::Cost),
        ..Default::default()
    };
    assert_eq!(
        setup.service.update_appointment(&context(), booked.id, &stray_reason, false).await.map(|s| s.warnings),
        Err(SchedulingError::Validation(ValidationError::CancelReasonWithoutCancellation))
    );
    let unchanged = setup.store.get(booked.id).await.unwrap();
    assert_eq!(unchanged.cancel_reason, None);

    let cancel = AppointmentPatch {
        status: Some(AppointmentStatus::Cancelled),
        cancel_reason: Some(CancelReason::Timing),
        ..Default::default()
    };
    setup.service.update_appointment(&context(), booked.id, &cancel, false).await.unwrap();

    // Amending the reason on an already cancelled appointment
    let scheduled = setup
        .service
        .update_appointment(&context(), booked.id, &stray_reason, false)
        .await
        .unwrap();
    assert_eq!(scheduled.appointment.status, AppointmentStatus::Cancelled);
    assert_eq!(scheduled.appointment.cancel_reason, Some(CancelReason::Cost));
}

#[test]
fn patch_tells_a_missing_patient_from_an_explicit_null() {
    let patient = Uuid::new_v4();

    let absent: AppointmentPatch = serde_json::from_value(json!({ "notes": "x" })).unwrap();
    let cleared: AppointmentPatch = serde_json::from_value(json!({ "patient_id": null })).unwrap();
    let set: AppointmentPatch = serde_json::from_value(json!({ "patient_id": patient })).unwrap();

    assert_eq!(absent.patient_id, None);
    assert_eq!(cleared.patient_id, Some(None));
    assert_eq!(set.patient_id, Some(Some(patient)));
}

#[tokio::test]
async fn booking_hours_are_checked_on_the_clinic_clock() {
    let setup = TestSetup::new();
    // 09:30 at a UTC+3 clinic, written in UTC
    let draft = patient_draft(setup.practitioner_id, "2024-03-04T06:30:00Z", "2024-03-04T07:00:00Z");

    assert!(setup.service.commit_appointment(&context_at_offset(180), &draft, false).await.is_ok());
    assert_matches!(
        setup.service.propose_appointment(&context(), &draft).await,
        Err(SchedulingError::OutsideWorkingHours { .. })
    );
}

// ==============================================================================
// SOFT DELETE AND LISTING
// ==============================================================================

#[tokio::test]
async fn deleted_appointment_stays_listed_but_frees_the_slot() {
    let setup = TestSetup::new();
    let booked = setup.book("2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z").await;

    assert_eq!(
        setup.service.delete_appointment(booked.id, " ").await,
        Err(SchedulingError::Validation(ValidationError::MissingDeleteReason))
    );
    setup.service.delete_appointment(booked.id, "Booked in error").await.unwrap();

    let listed = setup
        .service
        .list_appointments(Some(setup.practitioner_id), ts("2024-03-04T00:00:00Z"), ts("2024-03-05T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].deleted);
    assert_eq!(listed[0].delete_reason.as_deref(), Some("Booked in error"));

    let draft = patient_draft(setup.practitioner_id, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z");
    assert!(setup.service.commit_appointment(&context(), &draft, false).await.is_ok());

    let patch = AppointmentPatch {
        status: Some(AppointmentStatus::Confirmed),
        ..Default::default()
    };
    assert_eq!(
        setup.service.update_appointment(&context(), booked.id, &patch, false).await.map(|s| s.warnings),
        Err(SchedulingError::Validation(ValidationError::AppointmentDeleted(booked.id)))
    );
}

#[tokio::test]
async fn listing_filters_by_practitioner_and_range() {
    let practitioner = Uuid::new_v4();
    let setup = TestSetup::with_appointments(vec![
        appointment(practitioner, "2024-03-04T11:00:00Z", "2024-03-04T11:30:00Z"),
        appointment(practitioner, "2024-03-04T09:00:00Z", "2024-03-04T09:30:00Z"),
        appointment(practitioner, "2024-03-05T09:00:00Z", "2024-03-05T09:30:00Z"),
        appointment(Uuid::new_v4(), "2024-03-04T09:00:00Z", "2024-03-04T09:30:00Z"),
    ]);

    let listed = setup
        .service
        .list_appointments(Some(practitioner), ts("2024-03-04T00:00:00Z"), ts("2024-03-05T00:00:00Z"))
        .await
        .unwrap();

    let starts: Vec<Timestamp> = listed.iter().map(|a| a.start).collect();
    assert_eq!(starts, vec![ts("2024-03-04T09:00:00Z"), ts("2024-03-04T11:00:00Z")]);

    assert_matches!(
        setup
            .service
            .list_appointments(None, ts("2024-03-05T00:00:00Z"), ts("2024-03-04T00:00:00Z"))
            .await,
        Err(SchedulingError::Validation(ValidationError::InvalidInterval { .. }))
    );
}

// ==============================================================================
// FREE SLOT SEARCH
// ==============================================================================

#[tokio::test]
async fn next_slot_skips_booked_time() {
    let setup = TestSetup::new();
    setup.book("2024-03-04T09:00:00Z", "2024-03-04T09:30:00Z").await;

    let slot = setup
        .service
        .find_next_available_slot(
            &context(),
            setup.practitioner_id,
            ts("2024-03-04T09:00:00Z"),
            &ServiceType::service("consultation"),
            7,
        )
        .await
        .unwrap();

    assert_eq!(
        slot,
        Some(TimeRange { start: ts("2024-03-04T09:30:00Z"), end: ts("2024-03-04T10:00:00Z") })
    );
}

#[tokio::test]
async fn next_slot_rounds_up_and_rolls_over_the_weekend() {
    let setup = TestSetup::new();

    let rounded = setup
        .service
        .find_next_available_slot(
            &context(),
            setup.practitioner_id,
            ts("2024-03-04T09:07:30Z"),
            &ServiceType::service("follow_up"),
            7,
        )
        .await
        .unwrap();
    assert_eq!(rounded.map(|s| s.start), Some(ts("2024-03-04T09:15:00Z")));

    // Friday 17:45 leaves no room for 30 minutes before closing
    let monday = setup
        .service
        .find_next_available_slot(
            &context(),
            setup.practitioner_id,
            ts("2024-03-08T17:45:00Z"),
            &ServiceType::service("consultation"),
            7,
        )
        .await
        .unwrap();
    assert_eq!(monday.map(|s| s.start), Some(ts("2024-03-11T09:00:00Z")));
}

#[tokio::test]
async fn next_slot_gives_up_after_the_search_window() {
    let setup = TestSetup::new();

    let slot = setup
        .service
        .find_next_available_slot(
            &context(),
            setup.practitioner_id,
            ts("2024-03-02T09:00:00Z"),
            &ServiceType::service("consultation"),
            1,
        )
        .await
        .unwrap();

    assert_eq!(slot, None);
}

#[tokio::test]
async fn next_slot_follows_the_clinic_clock() {
    let setup = TestSetup::new();

    // 08:07 at a UTC+3 clinic: nothing before 09:00 local
    let slot = setup
        .service
        .find_next_available_slot(
            &context_at_offset(180),
            setup.practitioner_id,
            ts("2024-03-04T05:07:00Z"),
            &ServiceType::service("consultation"),
            7,
        )
        .await
        .unwrap();

    assert_eq!(
        slot,
        Some(TimeRange { start: ts("2024-03-04T09:00:00+03:00"), end: ts("2024-03-04T09:30:00+03:00") })
    );
}

#[tokio::test]
async fn next_slot_rejects_an_oversized_search_window() {
    let setup = TestSetup::new();
    let from = ts("2024-03-02T09:00:00Z");
    let consultation = ServiceType::service("consultation");

    for max_days in [MAX_SEARCH_DAYS + 1, 100_000, u32::MAX] {
        assert_eq!(
            setup
                .service
                .find_next_available_slot(&context(), setup.practitioner_id, from, &consultation, max_days)
                .await,
            Err(SchedulingError::Validation(ValidationError::SearchWindowTooLong {
                max_days,
                limit: MAX_SEARCH_DAYS
            }))
        );
    }

    let full_year = setup
        .service
        .find_next_available_slot(&context(), setup.practitioner_id, from, &consultation, MAX_SEARCH_DAYS)
        .await
        .unwrap();
    assert_eq!(full_year.map(|s| s.start), Some(ts("2024-03-04T09:00:00Z")));
}

#[tokio::test]
async fn next_slot_at_the_end_of_the_calendar_is_an_error() {
    let setup = TestSetup::new();
    let from = (DateTime::<Utc>::MAX_UTC - Duration::days(1)).fixed_offset();

    assert_eq!(
        setup
            .service
            .find_next_available_slot(&context(), setup.practitioner_id, from, &ServiceType::service("consultation"), 7)
            .await,
        Err(SchedulingError::Validation(ValidationError::SearchWindowOutOfRange { from }))
    );
}
