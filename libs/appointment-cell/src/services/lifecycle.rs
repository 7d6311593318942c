// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentDraft, AppointmentStatus, SchedulingError, StatusChange, TimeRange,
    ValidationError,
};

/// State machine for appointment status plus the field rules each state imposes.
///
/// Patient appointments start in `scheduled`; closures are created `blocked`
/// and never leave it. The two lifecycles only share the calendar slot.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(SchedulingError::InvalidStatusTransition {
                from: *current_status,
                to: *new_status,
            });
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled
            | AppointmentStatus::Confirmed
            | AppointmentStatus::Unreachable => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Unreachable,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states - only soft delete remains
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
            // Closures have no status transitions
            AppointmentStatus::Blocked => vec![],
        }
    }

    /// Checks the field rules for a new or edited draft.
    pub fn validate_draft(&self, draft: &AppointmentDraft) -> Result<(), ValidationError> {
        if draft.practitioner_id.is_none() {
            return Err(ValidationError::MissingPractitioner);
        }

        if draft.service_type.is_blocked() {
            let category = draft.block_category.ok_or(ValidationError::MissingBlockCategory)?;

            let has_note = draft
                .notes
                .as_deref()
                .map(|note| !note.trim().is_empty())
                .unwrap_or(false);
            if !has_note {
                return Err(ValidationError::MissingClosureNote);
            }

            match (category.requires_patient(), draft.patient_id.is_some()) {
                (true, false) => return Err(ValidationError::PatientRequiredForBlock(category)),
                (false, true) => return Err(ValidationError::PatientNotAllowedOnBlock(category)),
                _ => {}
            }
        } else {
            if draft.patient_id.is_none() {
                return Err(ValidationError::MissingPatient);
            }
            if draft.all_day {
                return Err(ValidationError::AllDayRequiresBlock);
            }
        }

        Ok(())
    }

    /// Materialises a validated draft in its initial state.
    pub fn create(
        &self,
        draft: &AppointmentDraft,
        interval: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        self.validate_draft(draft)?;
        let practitioner_id = draft.practitioner_id.ok_or(ValidationError::MissingPractitioner)?;

        let blocked = draft.service_type.is_blocked();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: draft.patient_id,
            practitioner_id,
            start: interval.start,
            end: interval.end,
            all_day: draft.is_all_day_block(),
            service_type: draft.service_type.clone(),
            status: if blocked { AppointmentStatus::Blocked } else { AppointmentStatus::Scheduled },
            notes: draft.notes.clone(),
            block_category: if blocked { draft.block_category } else { None },
            cancel_reason: None,
            delete_reason: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        info!("Created {} appointment {} for practitioner {}", appointment.status, appointment.id, practitioner_id);
        Ok(appointment)
    }

    /// Applies a status change. An unchanged status is not a transition.
    pub fn apply_status_change(
        &self,
        appointment: &Appointment,
        change: &StatusChange,
        now: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        if appointment.deleted {
            return Err(ValidationError::AppointmentDeleted(appointment.id).into());
        }
        if appointment.status == change.status {
            return Ok(appointment.clone());
        }

        self.validate_status_transition(&appointment.status, &change.status)?;

        let mut updated = appointment.clone();
        if change.status == AppointmentStatus::Cancelled {
            let reason = change.cancel_reason.ok_or(ValidationError::MissingCancelReason)?;
            updated.cancel_reason = Some(reason);
        }
        updated.status = change.status;
        updated.updated_at = now;

        info!("Appointment {} moved {} -> {}", appointment.id, appointment.status, updated.status);
        Ok(updated)
    }

    /// Marks the record deleted; it stays in the store with its reason.
    pub fn soft_delete(
        &self,
        appointment: &Appointment,
        delete_reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        if appointment.deleted {
            return Err(ValidationError::AppointmentDeleted(appointment.id).into());
        }

        let reason = delete_reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::MissingDeleteReason.into());
        }

        let mut updated = appointment.clone();
        updated.deleted = true;
        updated.delete_reason = Some(reason.to_string());
        updated.deleted_at = Some(now);
        updated.updated_at = now;

        info!("Appointment {} soft-deleted", appointment.id);
        Ok(updated)
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
