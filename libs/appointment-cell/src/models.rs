// libs/appointment-cell/src/models.rs
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Wall-clock instant carrying the offset it was entered with.
pub type Timestamp = DateTime<FixedOffset>;

/// Duration used when a service type is unknown to the catalog.
pub const DEFAULT_DURATION_MINUTES: u32 = 15;

/// Wire value of the closure sentinel in `service_type`.
pub const BLOCKED_SERVICE_TYPE: &str = "BLOCKED";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Option<Uuid>,
    pub practitioner_id: Uuid,
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(default)]
    pub all_day: bool,
    pub service_type: ServiceType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub block_category: Option<BlockCategory>,
    pub cancel_reason: Option<CancelReason>,
    pub delete_reason: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn interval(&self) -> TimeRange {
        TimeRange { start: self.start, end: self.end }
    }

    pub fn is_blocked(&self) -> bool {
        self.status == AppointmentStatus::Blocked
    }

    /// Live appointments occupy their slot; cancelled and deleted ones do not.
    pub fn is_live(&self) -> bool {
        self.status != AppointmentStatus::Cancelled && !self.deleted
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Unreachable,
    Cancelled,
    Completed,
    Blocked,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Unreachable => write!(f, "unreachable"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// Catalog identifier of the booked service, or the closure sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    Service(String),
    Blocked,
}

impl ServiceType {
    pub fn service(id: impl Into<String>) -> Self {
        ServiceType::from(id.into())
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ServiceType::Blocked)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::Service(id) => id,
            ServiceType::Blocked => BLOCKED_SERVICE_TYPE,
        }
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        if value == BLOCKED_SERVICE_TYPE {
            ServiceType::Blocked
        } else {
            ServiceType::Service(value)
        }
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        match value {
            ServiceType::Service(id) => id,
            ServiceType::Blocked => BLOCKED_SERVICE_TYPE.to_string(),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    Timing,
    Illness,
    Cost,
    ProviderChange,
    DurationMismatch,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    Meeting,
    Leave,
    Surgery,
    AcademicWork,
    Other,
}

impl BlockCategory {
    /// Closures that stand for a patient-linked event.
    pub fn requires_patient(&self) -> bool {
        matches!(self, BlockCategory::Surgery)
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockCategory::Meeting => write!(f, "meeting"),
            BlockCategory::Leave => write!(f, "leave"),
            BlockCategory::Surgery => write!(f, "surgery"),
            BlockCategory::AcademicWork => write!(f, "academic_work"),
            BlockCategory::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

// ==============================================================================
// CLINIC CONFIGURATION MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub is_active: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DaySchedule {
    pub fn open(start: NaiveTime, end: NaiveTime) -> Self {
        Self { is_active: true, start, end }
    }

    pub fn closed() -> Self {
        Self {
            is_active: false,
            start: NaiveTime::default(),
            end: NaiveTime::default(),
        }
    }
}

/// Weekly opening hours indexed by weekday, 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u8, DaySchedule>", into = "BTreeMap<u8, DaySchedule>")]
pub struct WorkingHoursConfig {
    days: [DaySchedule; 7],
}

impl WorkingHoursConfig {
    /// Builds a config from a sparse weekday map; missing weekdays are closed.
    pub fn from_days(days: BTreeMap<u8, DaySchedule>) -> Result<Self, ValidationError> {
        let mut resolved = [DaySchedule::closed(); 7];
        for (weekday, schedule) in days {
            if weekday > 6 {
                return Err(ValidationError::InvalidWeekday(weekday));
            }
            if schedule.is_active && schedule.start >= schedule.end {
                return Err(ValidationError::InvalidWorkingHours { weekday });
            }
            resolved[weekday as usize] = schedule;
        }
        Ok(Self { days: resolved })
    }

    pub fn day(&self, weekday_from_sunday: u32) -> &DaySchedule {
        &self.days[(weekday_from_sunday % 7) as usize]
    }
}

impl Default for WorkingHoursConfig {
    fn default() -> Self {
        let open = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
        let close = NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default();
        let weekday = DaySchedule::open(open, close);

        Self {
            days: [
                DaySchedule::closed(), // Sunday
                weekday,
                weekday,
                weekday,
                weekday,
                weekday,
                DaySchedule::closed(), // Saturday
            ],
        }
    }
}

impl TryFrom<BTreeMap<u8, DaySchedule>> for WorkingHoursConfig {
    type Error = ValidationError;

    fn try_from(days: BTreeMap<u8, DaySchedule>) -> Result<Self, Self::Error> {
        Self::from_days(days)
    }
}

impl From<WorkingHoursConfig> for BTreeMap<u8, DaySchedule> {
    fn from(config: WorkingHoursConfig) -> Self {
        config
            .days
            .iter()
            .enumerate()
            .map(|(weekday, schedule)| (weekday as u8, *schedule))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    pub id: String,
    pub label: String,
    pub default_duration_minutes: u32,
    /// Presentation only.
    pub color: String,
}

// ==============================================================================
// SCHEDULING REQUEST MODELS
// ==============================================================================

/// Transient interval under evaluation for a practitioner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub practitioner_id: Option<Uuid>,
    pub start: Timestamp,
    pub end: Timestamp,
    pub exclude_appointment_id: Option<Uuid>,
}

impl CandidateSlot {
    /// The slot an existing appointment occupies, excluding itself.
    pub fn for_appointment(appointment: &Appointment) -> Self {
        Self {
            practitioner_id: Some(appointment.practitioner_id),
            start: appointment.start,
            end: appointment.end,
            exclude_appointment_id: Some(appointment.id),
        }
    }
}

/// Editable state of the appointment dialog. The planner is a pure function
/// of these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub appointment_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub practitioner_id: Option<Uuid>,
    pub start: Timestamp,
    pub end: Timestamp,
    pub service_type: ServiceType,
    #[serde(default)]
    pub all_day: bool,
    pub block_category: Option<BlockCategory>,
    pub notes: Option<String>,
    /// Set once the user chose the end explicitly; service changes then leave it alone.
    #[serde(default)]
    pub duration_pinned: bool,
}

impl AppointmentDraft {
    /// Draft for an existing record. Its end is authoritative.
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            appointment_id: Some(appointment.id),
            patient_id: appointment.patient_id,
            practitioner_id: Some(appointment.practitioner_id),
            start: appointment.start,
            end: appointment.end,
            service_type: appointment.service_type.clone(),
            all_day: appointment.all_day,
            block_category: appointment.block_category,
            notes: appointment.notes.clone(),
            duration_pinned: true,
        }
    }

    pub fn is_all_day_block(&self) -> bool {
        self.all_day && self.service_type.is_blocked()
    }
}

/// A single edit made in the calendar or the appointment dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserIntent {
    /// Start field edited.
    SetStart { start: Timestamp },
    /// End field edited or end handle dragged.
    SetEnd { end: Timestamp },
    /// Click or drag on an empty calendar area.
    SelectInterval { start: Timestamp, end: Timestamp },
    /// Whole appointment dragged to a new start; duration is kept.
    Move { start: Timestamp },
    SetServiceType { service_type: ServiceType },
    ChangeStartDate { date: NaiveDate },
    ChangeEndDate { date: NaiveDate },
    SetAllDay { all_day: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
    pub cancel_reason: Option<CancelReason>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub service_type: Option<ServiceType>,
    pub status: Option<AppointmentStatus>,
    pub cancel_reason: Option<CancelReason>,
    pub notes: Option<String>,
    /// Absent leaves the patient alone; an explicit `null` unlinks it.
    #[serde(default, deserialize_with = "present_or_null", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Option<Uuid>>,
    /// Closures only.
    pub block_category: Option<BlockCategory>,
    /// `updated_at` the caller last saw; a mismatch is reported as a stale write.
    pub expected_updated_at: Option<DateTime<Utc>>,
}

fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ==============================================================================
// SCHEDULING RESULT MODELS
// ==============================================================================

/// Advisory signal: the slot overlaps another live booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub appointment_id: Uuid,
    pub practitioner_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub start: Timestamp,
    pub end: Timestamp,
    pub status: AppointmentStatus,
}

impl From<&Appointment> for ConflictWarning {
    fn from(appointment: &Appointment) -> Self {
        Self {
            appointment_id: appointment.id,
            practitioner_id: appointment.practitioner_id,
            patient_id: appointment.patient_id,
            start: appointment.start,
            end: appointment.end,
            status: appointment.status,
        }
    }
}

/// First phase of a booking: what would be written and what it collides with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub interval: TimeRange,
    pub status: AppointmentStatus,
    pub warnings: Vec<ConflictWarning>,
}

impl Proposal {
    pub fn requires_confirmation(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduled {
    pub appointment: Appointment,
    pub warnings: Vec<ConflictWarning>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
pub enum ValidationError {
    #[error("A practitioner is required")]
    MissingPractitioner,

    #[error("A patient is required for non-blocked appointments")]
    MissingPatient,

    #[error("A closure category is required")]
    MissingBlockCategory,

    #[error("A closure note is required")]
    MissingClosureNote,

    #[error("{0} closures must be linked to a patient")]
    PatientRequiredForBlock(BlockCategory),

    #[error("{0} closures cannot be linked to a patient")]
    PatientNotAllowedOnBlock(BlockCategory),

    #[error("Only blocked entries can span whole days")]
    AllDayRequiresBlock,

    #[error("A cancellation reason is required")]
    MissingCancelReason,

    #[error("A deletion reason is required")]
    MissingDeleteReason,

    #[error("End {end} must be after start {start}")]
    InvalidInterval { start: Timestamp, end: Timestamp },

    #[error("Appointment {0} has been deleted")]
    AppointmentDeleted(Uuid),

    #[error("Weekday {0} is out of range 0-6")]
    InvalidWeekday(u8),

    #[error("Working hours for weekday {weekday} must start before they end")]
    InvalidWorkingHours { weekday: u8 },

    #[error("Service type {0} must have a positive default duration")]
    InvalidServiceDuration(String),

    #[error("Only blocked entries carry a closure category")]
    BlockCategoryRequiresBlock,

    #[error("A cancellation reason can only be given for a cancelled appointment")]
    CancelReasonWithoutCancellation,

    #[error("Search window of {max_days} days exceeds the {limit}-day limit")]
    SearchWindowTooLong { max_days: u32, limit: u32 },

    #[error("Search window starting at {from} runs past the supported calendar range")]
    SearchWindowOutOfRange { from: Timestamp },

    #[error("Clinic UTC offset of {0} minutes is out of range")]
    InvalidClinicOffset(i32),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulingError {
    #[error("The clinic is closed at {instant}")]
    OutsideWorkingHours { instant: Timestamp },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Appointment {0} not found")]
    NotFound(Uuid),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Slot overlaps {} existing booking(s)", .0.len())]
    ConflictDetected(Vec<ConflictWarning>),

    #[error("Appointment {id} was modified by someone else")]
    StaleWrite { id: Uuid },

    #[error("Storage error: {0}")]
    Storage(String),
}
