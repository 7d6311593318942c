// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Timelike, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentDraft, AppointmentPatch, AppointmentStatus, CandidateSlot,
    ConflictWarning, Proposal, Scheduled, SchedulingError, ServiceType, StatusChange, TimeRange,
    Timestamp, UserIntent, ValidationError,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::consistency::PractitionerLocks;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::reschedule::ReschedulePlanner;
use crate::services::settings::SchedulingContext;
use crate::services::store::AppointmentStore;

/// Granularity of the free-slot search.
pub const SLOT_STEP_MINUTES: u32 = 15;

/// Longest window the free-slot search will scan.
pub const MAX_SEARCH_DAYS: u32 = 366;

/// Runs scheduling requests through working hours, conflict detection and the
/// lifecycle before anything reaches the store.
///
/// Bookings are two-phase: [`propose_appointment`](Self::propose_appointment)
/// reports conflicts without writing, [`commit_appointment`](Self::commit_appointment)
/// re-checks under the practitioner's write lock and only writes over a
/// conflict when `force` is set.
pub struct SchedulingService {
    store: Arc<dyn AppointmentStore>,
    conflict_service: ConflictDetectionService,
    lifecycle_service: AppointmentLifecycleService,
    planner: ReschedulePlanner,
    locks: PractitionerLocks,
}

impl SchedulingService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            store,
            conflict_service: ConflictDetectionService::new(),
            lifecycle_service: AppointmentLifecycleService::new(),
            planner: ReschedulePlanner::new(),
            locks: PractitionerLocks::new(),
        }
    }

    pub fn planner(&self) -> &ReschedulePlanner {
        &self.planner
    }

    pub async fn list_appointments(
        &self,
        practitioner_id: Option<Uuid>,
        range_start: Timestamp,
        range_end: Timestamp,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        if range_end <= range_start {
            return Err(ValidationError::InvalidInterval { start: range_start, end: range_end }.into());
        }
        self.store.list(practitioner_id, range_start, range_end).await
    }

    /// First phase: validates the draft and reports conflicts. Writes nothing.
    #[instrument(skip(self, ctx, draft), fields(practitioner = ?draft.practitioner_id))]
    pub async fn propose_appointment(
        &self,
        ctx: &SchedulingContext,
        draft: &AppointmentDraft,
    ) -> Result<Proposal, SchedulingError> {
        let interval = self.check_draft(ctx, draft)?;
        let warnings = self
            .conflicts_for(draft.practitioner_id, interval, draft.appointment_id)
            .await?;

        let status = if draft.service_type.is_blocked() {
            AppointmentStatus::Blocked
        } else {
            AppointmentStatus::Scheduled
        };

        debug!("Proposal for {:?}: {} warnings", interval, warnings.len());
        Ok(Proposal { interval, status, warnings })
    }

    /// Second phase: repeats every check against a fresh snapshot while
    /// holding the practitioner's write lock, then persists.
    #[instrument(skip(self, ctx, draft), fields(practitioner = ?draft.practitioner_id))]
    pub async fn commit_appointment(
        &self,
        ctx: &SchedulingContext,
        draft: &AppointmentDraft,
        force: bool,
    ) -> Result<Appointment, SchedulingError> {
        let interval = self.check_draft(ctx, draft)?;
        let practitioner_id = draft.practitioner_id.ok_or(ValidationError::MissingPractitioner)?;

        let _guard = self.locks.acquire(practitioner_id).await;

        let warnings = self.conflicts_for(Some(practitioner_id), interval, None).await?;
        if !warnings.is_empty() {
            if !force {
                return Err(SchedulingError::ConflictDetected(warnings));
            }
            warn!(
                "Booking over {} conflicting appointments for practitioner {} after confirmation",
                warnings.len(),
                practitioner_id
            );
        }

        let appointment = self.lifecycle_service.create(draft, interval, now())?;
        let saved = self.store.insert(appointment).await?;

        info!("Appointment {} committed for practitioner {}", saved.id, practitioner_id);
        Ok(saved)
    }

    /// Applies time, status and field changes to an existing appointment.
    ///
    /// Time changes are gated like a new booking. Status changes re-run the
    /// conflict check for warnings only and are never blocked by it.
    #[instrument(skip(self, ctx, patch))]
    pub async fn update_appointment(
        &self,
        ctx: &SchedulingContext,
        id: Uuid,
        patch: &AppointmentPatch,
        force: bool,
    ) -> Result<Scheduled, SchedulingError> {
        let current = self.store.get(id).await?;

        if current.deleted {
            return Err(ValidationError::AppointmentDeleted(id).into());
        }
        if let Some(expected) = patch.expected_updated_at {
            if expected != current.updated_at {
                return Err(SchedulingError::StaleWrite { id });
            }
        }

        let draft = self.apply_patch(ctx, &current, patch)?;
        self.lifecycle_service.validate_draft(&draft)?;
        let interval = self.planner.resolve_interval(ctx, &draft)?;

        let times_changed = interval != current.interval();
        if times_changed && !draft.is_all_day_block() {
            ctx.working_hours.ensure_open(&interval.start)?;
        }

        let _guard = self.locks.acquire(current.practitioner_id).await;

        let timestamp = now();
        let mut updated = current.clone();
        updated.start = interval.start;
        updated.end = interval.end;
        updated.all_day = draft.is_all_day_block();
        updated.service_type = draft.service_type.clone();
        updated.notes = draft.notes.clone();
        updated.patient_id = draft.patient_id;
        updated.block_category = draft.block_category;

        if let Some(status) = patch.status {
            let change = StatusChange { status, cancel_reason: patch.cancel_reason };
            updated = self.lifecycle_service.apply_status_change(&updated, &change, timestamp)?;
        }
        if let Some(reason) = patch.cancel_reason {
            // Amends the reason on an already cancelled appointment.
            if updated.status != AppointmentStatus::Cancelled {
                return Err(ValidationError::CancelReasonWithoutCancellation.into());
            }
            updated.cancel_reason = Some(reason);
        }
        updated.updated_at = timestamp;

        let warnings = if updated.is_live() {
            self.conflicts_for(Some(updated.practitioner_id), updated.interval(), Some(id))
                .await?
        } else {
            Vec::new()
        };

        if times_changed && !warnings.is_empty() && !force {
            return Err(SchedulingError::ConflictDetected(warnings));
        }

        let saved = self.store.update(updated, current.updated_at).await?;
        info!("Appointment {} updated ({} warnings)", id, warnings.len());

        Ok(Scheduled { appointment: saved, warnings })
    }

    /// Soft delete: the record and its reason stay in the store.
    #[instrument(skip(self, delete_reason))]
    pub async fn delete_appointment(&self, id: Uuid, delete_reason: &str) -> Result<(), SchedulingError> {
        let current = self.store.get(id).await?;
        let deleted = self.lifecycle_service.soft_delete(&current, delete_reason, now())?;
        self.store.update(deleted, current.updated_at).await?;
        Ok(())
    }

    /// Earliest slot at or after `from` that lies inside one day's opening
    /// hours and collides with nothing, scanning `max_days` ahead.
    ///
    /// Slots are aligned to quarter hours on the clinic clock and reported in
    /// the clinic's offset. Windows longer than [`MAX_SEARCH_DAYS`] are rejected.
    pub async fn find_next_available_slot(
        &self,
        ctx: &SchedulingContext,
        practitioner_id: Uuid,
        from: Timestamp,
        service_type: &ServiceType,
        max_days: u32,
    ) -> Result<Option<TimeRange>, SchedulingError> {
        if max_days > MAX_SEARCH_DAYS {
            return Err(ValidationError::SearchWindowTooLong { max_days, limit: MAX_SEARCH_DAYS }.into());
        }

        let duration = Duration::minutes(ctx.service_catalog.duration_for(service_type) as i64);
        let out_of_range = || ValidationError::SearchWindowOutOfRange { from };
        let search_end = from
            .checked_add_signed(Duration::days(max_days as i64))
            .ok_or_else(out_of_range)?;
        let snapshot_end = search_end.checked_add_signed(duration).ok_or_else(out_of_range)?;
        let snapshot = self
            .store
            .list(Some(practitioner_id), from, snapshot_end)
            .await?;

        let mut current = round_up_to_step(ctx.working_hours.local(&from)).ok_or_else(out_of_range)?;
        while current < search_end {
            let Some(end) = current.checked_add_signed(duration) else {
                break;
            };

            if ctx.working_hours.fits_within_hours(&current, &end) {
                let candidate = CandidateSlot {
                    practitioner_id: Some(practitioner_id),
                    start: current,
                    end,
                    exclude_appointment_id: None,
                };
                if self.conflict_service.find_conflict(&candidate, &snapshot).is_none() {
                    return Ok(Some(TimeRange { start: current, end }));
                }
            }

            current = match current.checked_add_signed(Duration::minutes(SLOT_STEP_MINUTES as i64)) {
                Some(next) => next,
                None => break,
            };
        }

        debug!("No free slot for practitioner {} within {} days", practitioner_id, max_days);
        Ok(None)
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    fn check_draft(
        &self,
        ctx: &SchedulingContext,
        draft: &AppointmentDraft,
    ) -> Result<TimeRange, SchedulingError> {
        self.lifecycle_service.validate_draft(draft)?;
        let interval = self.planner.resolve_interval(ctx, draft)?;

        if !draft.is_all_day_block() {
            ctx.working_hours.ensure_open(&interval.start)?;
        }

        Ok(interval)
    }

    fn apply_patch(
        &self,
        ctx: &SchedulingContext,
        current: &Appointment,
        patch: &AppointmentPatch,
    ) -> Result<AppointmentDraft, SchedulingError> {
        let mut draft = AppointmentDraft::from_appointment(current);

        if let Some(service_type) = &patch.service_type {
            if service_type.is_blocked() != current.is_blocked() {
                let to = if service_type.is_blocked() {
                    AppointmentStatus::Blocked
                } else {
                    AppointmentStatus::Scheduled
                };
                return Err(SchedulingError::InvalidStatusTransition { from: current.status, to });
            }
            draft = self.planner.apply(
                ctx,
                &draft,
                UserIntent::SetServiceType { service_type: service_type.clone() },
            );
        }
        if let Some(start) = patch.start {
            draft = self.planner.apply(ctx, &draft, UserIntent::SetStart { start });
        }
        if let Some(end) = patch.end {
            draft = self.planner.apply(ctx, &draft, UserIntent::SetEnd { end });
        }
        if let Some(notes) = &patch.notes {
            draft.notes = Some(notes.clone());
        }
        if let Some(patient_id) = patch.patient_id {
            draft.patient_id = patient_id;
        }
        if let Some(category) = patch.block_category {
            if !current.is_blocked() {
                return Err(ValidationError::BlockCategoryRequiresBlock.into());
            }
            draft.block_category = Some(category);
        }

        Ok(draft)
    }

    async fn conflicts_for(
        &self,
        practitioner_id: Option<Uuid>,
        interval: TimeRange,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<ConflictWarning>, SchedulingError> {
        let Some(practitioner_id) = practitioner_id else {
            return Ok(Vec::new());
        };

        let snapshot = self
            .store
            .list(Some(practitioner_id), interval.start, interval.end)
            .await?;
        let candidate = CandidateSlot {
            practitioner_id: Some(practitioner_id),
            start: interval.start,
            end: interval.end,
            exclude_appointment_id,
        };

        Ok(self.conflict_service.warnings(&candidate, &snapshot))
    }
}

/// Microsecond precision, matching what the hosted store keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn round_up_to_step(instant: Timestamp) -> Option<Timestamp> {
    let seconds_into_step = (instant.minute() % SLOT_STEP_MINUTES) as i64 * 60 + instant.second() as i64;
    let nanos = instant.nanosecond() as i64;
    if seconds_into_step == 0 && nanos == 0 {
        return Some(instant);
    }
    let step_start = instant - Duration::seconds(seconds_into_step) - Duration::nanoseconds(nanos);
    step_start.checked_add_signed(Duration::minutes(SLOT_STEP_MINUTES as i64))
}
