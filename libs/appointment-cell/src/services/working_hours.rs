// libs/appointment-cell/src/services/working_hours.rs
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};
use tracing::debug;

use crate::models::{SchedulingError, Timestamp, ValidationError, WorkingHoursConfig};

/// Answers whether an instant falls inside the clinic's opening hours.
///
/// Weekdays, minutes and calendar days are read on the clinic's own clock,
/// so two spellings of the same instant always get the same answer.
#[derive(Debug, Clone)]
pub struct WorkingHoursCalendar {
    config: WorkingHoursConfig,
    offset: FixedOffset,
}

impl WorkingHoursCalendar {
    /// Clinic clock at UTC.
    pub fn new(config: WorkingHoursConfig) -> Self {
        Self::with_offset(config, Utc.fix())
    }

    pub fn with_offset(config: WorkingHoursConfig, offset: FixedOffset) -> Self {
        Self { config, offset }
    }

    /// Same hours, read on a different clinic clock.
    pub fn at_offset(self, offset: FixedOffset) -> Self {
        Self { offset, ..self }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The same instant read on the clinic's clock.
    pub fn local(&self, instant: &Timestamp) -> Timestamp {
        instant.with_timezone(&self.offset)
    }

    /// Half-open containment of the clinic-local minute in its weekday window.
    pub fn is_open(&self, instant: &Timestamp) -> bool {
        let local = self.local(instant);
        let day = self.config.day(local.weekday().num_days_from_sunday());
        if !day.is_active {
            return false;
        }

        let minute = minutes_since_midnight(local.time());
        minute >= minutes_since_midnight(day.start) && minute < minutes_since_midnight(day.end)
    }

    /// Rejection form of [`is_open`](Self::is_open) for call sites that propagate errors.
    pub fn ensure_open(&self, instant: &Timestamp) -> Result<(), SchedulingError> {
        if self.is_open(instant) {
            Ok(())
        } else {
            debug!("Rejected {}: outside working hours", instant);
            Err(SchedulingError::OutsideWorkingHours { instant: *instant })
        }
    }

    /// True when `start` is open and `end` does not run past the same day's close.
    pub fn fits_within_hours(&self, start: &Timestamp, end: &Timestamp) -> bool {
        if !self.is_open(start) || end <= start {
            return false;
        }

        let (start, end) = (self.local(start), self.local(end));
        if end.date_naive() != start.date_naive() {
            return false;
        }

        let day = self.config.day(start.weekday().num_days_from_sunday());
        minutes_since_midnight(end.time()) <= minutes_since_midnight(day.end)
    }

    // ==============================================================================
    // DAY BOUNDARY HELPERS
    // ==============================================================================

    /// Calendar day the instant falls on at the clinic.
    pub fn local_date(&self, instant: &Timestamp) -> NaiveDate {
        self.local(instant).date_naive()
    }

    /// Moves `instant` to `date`, keeping its clinic-local time of day.
    /// The result carries the offset `instant` came with.
    pub fn on_date(&self, instant: &Timestamp, date: NaiveDate) -> Timestamp {
        let time = self.local(instant).time();
        self.at(instant, date, time)
    }

    pub fn start_of_day(&self, instant: &Timestamp) -> Timestamp {
        self.at(instant, self.local_date(instant), NaiveTime::default())
    }

    /// 23:59:59 on the instant's clinic-local day.
    pub fn end_of_day(&self, instant: &Timestamp) -> Timestamp {
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
        self.at(instant, self.local_date(instant), last_second)
    }

    fn at(&self, reference: &Timestamp, date: NaiveDate, time: NaiveTime) -> Timestamp {
        let utc = date.and_time(time) - Duration::seconds(self.offset.local_minus_utc() as i64);
        Timestamp::from_naive_utc_and_offset(utc, *reference.offset())
    }
}

impl Default for WorkingHoursCalendar {
    fn default() -> Self {
        Self::new(WorkingHoursConfig::default())
    }
}

/// Offset for a clinic `minutes` east of UTC.
pub fn clinic_offset(minutes: i32) -> Result<FixedOffset, ValidationError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(ValidationError::InvalidClinicOffset(minutes))
}

fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
