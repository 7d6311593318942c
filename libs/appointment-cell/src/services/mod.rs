pub mod working_hours;
pub mod catalog;
pub mod conflict;
pub mod lifecycle;
pub mod reschedule;
pub mod consistency;
pub mod store;
pub mod supabase_store;
pub mod settings;
pub mod booking;

pub use working_hours::{clinic_offset, WorkingHoursCalendar};
pub use catalog::ServiceCatalog;
pub use conflict::ConflictDetectionService;
pub use lifecycle::AppointmentLifecycleService;
pub use reschedule::ReschedulePlanner;
pub use consistency::PractitionerLocks;
pub use store::{AppointmentStore, InMemoryAppointmentStore};
pub use supabase_store::SupabaseAppointmentStore;
pub use settings::{
    configured_offset, ClinicSettingsProvider, SchedulingContext, StaticClinicSettings,
    SupabaseClinicSettings,
};
pub use booking::{SchedulingService, MAX_SEARCH_DAYS};
