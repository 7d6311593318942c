// libs/appointment-cell/src/services/supabase_store.rs
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, SchedulingError, Timestamp};
use crate::services::store::AppointmentStore;

const APPOINTMENTS_PATH: &str = "/rest/v1/appointments";

/// Appointment store backed by the hosted `appointments` table.
pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, SchedulingError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| SchedulingError::Storage(format!("Failed to parse appointments: {}", e)))
    }

    fn to_row(appointment: &Appointment) -> Result<Value, SchedulingError> {
        serde_json::to_value(appointment)
            .map_err(|e| SchedulingError::Storage(format!("Failed to encode appointment: {}", e)))
    }
}

/// UTC form with a `Z` suffix, percent-encoded for a PostgREST filter.
fn filter_value<Tz: chrono::TimeZone>(instant: &DateTime<Tz>) -> String {
    let utc = instant.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true);
    urlencoding::encode(&utc).into_owned()
}

fn storage_error(e: anyhow::Error) -> SchedulingError {
    SchedulingError::Storage(e.to_string())
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn list(
        &self,
        practitioner_id: Option<Uuid>,
        range_start: Timestamp,
        range_end: Timestamp,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let mut query_parts = vec![
            format!("start=lt.{}", filter_value(&range_end)),
            format!("end=gt.{}", filter_value(&range_start)),
        ];
        if let Some(id) = practitioner_id {
            query_parts.push(format!("practitioner_id=eq.{}", id));
        }

        let path = format!("{}?{}&order=start.asc", APPOINTMENTS_PATH, query_parts.join("&"));
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(storage_error)?;

        debug!("Fetched {} appointment rows", rows.len());
        Self::parse_rows(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        let path = format!("{}?id=eq.{}&limit=1", APPOINTMENTS_PATH, id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(storage_error)?;

        Self::parse_rows(rows)?
            .into_iter()
            .next()
            .ok_or(SchedulingError::NotFound(id))
    }

    async fn insert(&self, appointment: Appointment) -> Result<Appointment, SchedulingError> {
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                APPOINTMENTS_PATH,
                Some(Self::to_row(&appointment)?),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(storage_error)?;

        Self::parse_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| SchedulingError::Storage("Insert returned no rows".to_string()))
    }

    async fn update(
        &self,
        appointment: Appointment,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        let path = format!(
            "{}?id=eq.{}&updated_at=eq.{}",
            APPOINTMENTS_PATH,
            appointment.id,
            filter_value(&expected_updated_at)
        );

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Self::to_row(&appointment)?),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(storage_error)?;

        match Self::parse_rows(rows)?.into_iter().next() {
            Some(updated) => Ok(updated),
            None => {
                // Zero rows: either the id is gone or updated_at moved on.
                self.get(appointment.id).await?;
                warn!("Optimistic update rejected for appointment {}", appointment.id);
                Err(SchedulingError::StaleWrite { id: appointment.id })
            }
        }
    }
}
