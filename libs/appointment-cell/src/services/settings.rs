// libs/appointment-cell/src/services/settings.rs
use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ServiceCatalogEntry, ValidationError, WorkingHoursConfig};
use crate::services::catalog::ServiceCatalog;
use crate::services::working_hours::{clinic_offset, WorkingHoursCalendar};

/// Clinic configuration every scheduling decision is evaluated against.
/// Passed explicitly; nothing in the core reads ambient settings.
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    pub working_hours: WorkingHoursCalendar,
    pub service_catalog: ServiceCatalog,
}

impl SchedulingContext {
    pub fn new(
        working_hours: WorkingHoursConfig,
        services: Vec<ServiceCatalogEntry>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            working_hours: WorkingHoursCalendar::new(working_hours),
            service_catalog: ServiceCatalog::new(services)?,
        })
    }

    /// Same settings read on a clinic clock `offset` from UTC.
    pub fn with_clinic_offset(self, offset: FixedOffset) -> Self {
        Self {
            working_hours: self.working_hours.at_offset(offset),
            ..self
        }
    }
}

/// Clinic clock from `CLINIC_UTC_OFFSET_MINUTES`; out-of-range values read as UTC.
pub fn configured_offset(config: &AppConfig) -> FixedOffset {
    clinic_offset(config.clinic_utc_offset_minutes).unwrap_or_else(|e| {
        warn!("{}, using UTC", e);
        Utc.fix()
    })
}

/// Source of clinic settings, read at the start of each scheduling session.
#[async_trait]
pub trait ClinicSettingsProvider: Send + Sync {
    /// Never fails: unreadable settings fall back to defaults.
    async fn load_context(&self) -> SchedulingContext;
}

/// Fixed snapshot, for tests and single-clinic deployments.
pub struct StaticClinicSettings {
    context: SchedulingContext,
}

impl StaticClinicSettings {
    pub fn new(context: SchedulingContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl ClinicSettingsProvider for StaticClinicSettings {
    async fn load_context(&self) -> SchedulingContext {
        self.context.clone()
    }
}

#[derive(Debug, Deserialize)]
struct SettingRow {
    value: Value,
}

/// Reads `clinic_settings` (keys `working_hours` and `utc_offset_minutes`)
/// and `service_types`.
pub struct SupabaseClinicSettings {
    supabase: SupabaseClient,
    default_offset: FixedOffset,
}

impl SupabaseClinicSettings {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            default_offset: configured_offset(config),
        }
    }

    async fn fetch_offset(&self) -> anyhow::Result<Option<FixedOffset>> {
        let rows: Vec<SettingRow> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/clinic_settings?key=eq.utc_offset_minutes&select=value&limit=1",
                None,
            )
            .await?;

        match rows.into_iter().next() {
            Some(row) => {
                let minutes: i32 = serde_json::from_value(row.value)?;
                Ok(Some(clinic_offset(minutes)?))
            }
            None => Ok(None),
        }
    }

    async fn fetch_working_hours(&self) -> anyhow::Result<Option<WorkingHoursConfig>> {
        let rows: Vec<SettingRow> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/clinic_settings?key=eq.working_hours&select=value&limit=1",
                None,
            )
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row.value)?)),
            None => Ok(None),
        }
    }

    async fn fetch_services(&self) -> anyhow::Result<ServiceCatalog> {
        let entries: Vec<ServiceCatalogEntry> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/service_types?select=id,label,default_duration_minutes,color",
                None,
            )
            .await?;

        Ok(ServiceCatalog::new(entries)?)
    }
}

#[async_trait]
impl ClinicSettingsProvider for SupabaseClinicSettings {
    async fn load_context(&self) -> SchedulingContext {
        let working_hours = match self.fetch_working_hours().await {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("No working hours configured, using defaults");
                WorkingHoursConfig::default()
            }
            Err(e) => {
                warn!("Failed to load working hours, using defaults: {}", e);
                WorkingHoursConfig::default()
            }
        };

        let service_catalog = self.fetch_services().await.unwrap_or_else(|e| {
            warn!("Failed to load service catalog, using defaults: {}", e);
            ServiceCatalog::default()
        });

        let offset = match self.fetch_offset().await {
            Ok(Some(offset)) => offset,
            Ok(None) => self.default_offset,
            Err(e) => {
                warn!("Failed to load clinic UTC offset, using {}: {}", self.default_offset, e);
                self.default_offset
            }
        };

        SchedulingContext {
            working_hours: WorkingHoursCalendar::with_offset(working_hours, offset),
            service_catalog,
        }
    }
}
