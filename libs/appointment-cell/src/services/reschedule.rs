// libs/appointment-cell/src/services/reschedule.rs
use chrono::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    AppointmentDraft, SchedulingError, ServiceType, TimeRange, Timestamp, UserIntent,
    ValidationError,
};
use crate::services::catalog::ServiceCatalog;
use crate::services::settings::SchedulingContext;

/// Turns calendar gestures and dialog edits into an appointment interval.
///
/// Duration inference: while `duration_pinned` is false the end follows
/// `start + default duration of the service type`. Any explicit end choice
/// pins it, and drafts of existing appointments start out pinned.
///
/// Date edits and whole-day bounds use the clinic's calendar day, not the
/// day of whatever offset the draft's timestamps were written in.
pub struct ReschedulePlanner;

impl ReschedulePlanner {
    pub fn new() -> Self {
        Self
    }

    /// Draft for a new booking from a calendar selection. A selection that
    /// spans more than an instant pins the end.
    pub fn new_draft(
        &self,
        ctx: &SchedulingContext,
        practitioner_id: Option<Uuid>,
        service_type: ServiceType,
        start: Timestamp,
        end: Timestamp,
    ) -> AppointmentDraft {
        let draft = AppointmentDraft {
            appointment_id: None,
            patient_id: None,
            practitioner_id,
            start,
            end: start,
            service_type,
            all_day: false,
            block_category: None,
            notes: None,
            duration_pinned: false,
        };
        self.apply(ctx, &draft, UserIntent::SelectInterval { start, end })
    }

    /// Applies one edit and returns the updated draft.
    pub fn apply(
        &self,
        ctx: &SchedulingContext,
        draft: &AppointmentDraft,
        intent: UserIntent,
    ) -> AppointmentDraft {
        let catalog = &ctx.service_catalog;
        let calendar = &ctx.working_hours;
        debug!("Planning {:?} on draft {:?}", intent, draft.appointment_id);
        let mut next = draft.clone();

        match intent {
            UserIntent::SetStart { start } => self.shift_start(ctx, &mut next, start),
            UserIntent::SetEnd { end } => {
                next.end = end;
                next.duration_pinned = true;
            }
            UserIntent::SelectInterval { start, end } => {
                if end > start {
                    next.start = start;
                    next.end = end;
                    next.duration_pinned = true;
                } else if next.duration_pinned {
                    // Click on an existing appointment's slot: keep its length.
                    let length = next.end - next.start;
                    next.start = start;
                    next.end = start + length;
                } else {
                    next.start = start;
                    next.end = inferred_end(catalog, start, &next.service_type);
                }
            }
            UserIntent::Move { start } => {
                let length = next.end - next.start;
                next.start = start;
                next.end = start + length;
            }
            UserIntent::SetServiceType { service_type } => {
                next.service_type = service_type;
                if !next.duration_pinned {
                    next.end = inferred_end(catalog, next.start, &next.service_type);
                }
            }
            UserIntent::ChangeStartDate { date } => {
                let start = calendar.on_date(&next.start, date);
                self.shift_start(ctx, &mut next, start);
            }
            UserIntent::ChangeEndDate { date } => {
                next.end = calendar.on_date(&next.end, date);
                next.duration_pinned = true;
            }
            UserIntent::SetAllDay { all_day } => next.all_day = all_day,
        }

        next
    }

    /// Applies the edit and resolves the resulting interval.
    pub fn plan(
        &self,
        ctx: &SchedulingContext,
        draft: &AppointmentDraft,
        intent: UserIntent,
    ) -> Result<TimeRange, SchedulingError> {
        let next = self.apply(ctx, draft, intent);
        self.resolve_interval(ctx, &next)
    }

    /// Interval to persist. All-day closures cover whole days; everything
    /// else must end after it starts.
    pub fn resolve_interval(
        &self,
        ctx: &SchedulingContext,
        draft: &AppointmentDraft,
    ) -> Result<TimeRange, SchedulingError> {
        let calendar = &ctx.working_hours;
        let (start, end) = if draft.is_all_day_block() {
            (calendar.start_of_day(&draft.start), calendar.end_of_day(&draft.end))
        } else {
            (draft.start, draft.end)
        };

        if end <= start {
            return Err(ValidationError::InvalidInterval { start, end }.into());
        }

        Ok(TimeRange { start, end })
    }

    fn shift_start(&self, ctx: &SchedulingContext, draft: &mut AppointmentDraft, start: Timestamp) {
        let calendar = &ctx.working_hours;
        let previous = draft.start;
        draft.start = start;

        if draft.is_all_day_block() {
            return;
        }

        if !draft.duration_pinned {
            draft.end = inferred_end(&ctx.service_catalog, start, &draft.service_type);
        } else if calendar.local_date(&start) != calendar.local_date(&previous) {
            draft.end = calendar.on_date(&draft.end, calendar.local_date(&start));
        }
    }
}

impl Default for ReschedulePlanner {
    fn default() -> Self {
        Self::new()
    }
}

fn inferred_end(catalog: &ServiceCatalog, start: Timestamp, service_type: &ServiceType) -> Timestamp {
    start + Duration::minutes(catalog.duration_for(service_type) as i64)
}
