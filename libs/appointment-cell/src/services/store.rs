// libs/appointment-cell/src/services/store.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, SchedulingError, Timestamp};
use crate::services::conflict::ConflictDetectionService;

/// Authoritative home of the appointment set.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Every record overlapping `[range_start, range_end)`, cancelled and
    /// deleted ones included, ordered by start.
    async fn list(
        &self,
        practitioner_id: Option<Uuid>,
        range_start: Timestamp,
        range_end: Timestamp,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    async fn get(&self, id: Uuid) -> Result<Appointment, SchedulingError>;

    async fn insert(&self, appointment: Appointment) -> Result<Appointment, SchedulingError>;

    /// Replaces the record only if its stored `updated_at` still equals
    /// `expected_updated_at`.
    async fn update(
        &self,
        appointment: Appointment,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError>;
}

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: RwLock::new(appointments.into_iter().map(|a| (a.id, a)).collect()),
        }
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn list(
        &self,
        practitioner_id: Option<Uuid>,
        range_start: Timestamp,
        range_end: Timestamp,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let appointments = self.appointments.read().await;

        let mut matching: Vec<Appointment> = appointments
            .values()
            .filter(|a| practitioner_id.map_or(true, |id| a.practitioner_id == id))
            .filter(|a| ConflictDetectionService::appointments_overlap(range_start, range_end, a.start, a.end))
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.start);

        debug!("Listed {} appointments between {} and {}", matching.len(), range_start, range_end);
        Ok(matching)
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.appointments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SchedulingError::NotFound(id))
    }

    async fn insert(&self, appointment: Appointment) -> Result<Appointment, SchedulingError> {
        let mut appointments = self.appointments.write().await;
        if appointments.contains_key(&appointment.id) {
            return Err(SchedulingError::Storage(format!(
                "Appointment {} already exists",
                appointment.id
            )));
        }
        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update(
        &self,
        appointment: Appointment,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        let mut appointments = self.appointments.write().await;
        let stored = appointments
            .get_mut(&appointment.id)
            .ok_or(SchedulingError::NotFound(appointment.id))?;

        if stored.updated_at != expected_updated_at {
            return Err(SchedulingError::StaleWrite { id: appointment.id });
        }

        *stored = appointment.clone();
        Ok(appointment)
    }
}
