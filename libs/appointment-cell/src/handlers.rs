// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::{AppConfig, StoreBackend};
use shared_models::error::AppError;

use crate::models::{
    AppointmentDraft, AppointmentPatch, SchedulingError, ServiceType, Timestamp, UserIntent,
};
use crate::services::booking::SchedulingService;
use crate::services::settings::{
    configured_offset, ClinicSettingsProvider, SchedulingContext, StaticClinicSettings,
    SupabaseClinicSettings,
};
use crate::services::store::{AppointmentStore, InMemoryAppointmentStore};
use crate::services::supabase_store::SupabaseAppointmentStore;

/// How far ahead `/schedule/next-slot` looks when the caller does not say.
const DEFAULT_SEARCH_DAYS: u32 = 14;

/// Shared state behind every appointment route.
pub struct AppState {
    pub config: AppConfig,
    pub scheduling: Arc<SchedulingService>,
    pub settings: Arc<dyn ClinicSettingsProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn AppointmentStore>,
        settings: Arc<dyn ClinicSettingsProvider>,
    ) -> Self {
        Self {
            config,
            scheduling: Arc::new(SchedulingService::new(store)),
            settings,
        }
    }

    /// Wires the store and settings source selected by `APPOINTMENT_STORE`.
    pub fn from_config(config: AppConfig) -> Self {
        let (store, settings): (Arc<dyn AppointmentStore>, Arc<dyn ClinicSettingsProvider>) =
            match config.store_backend {
                StoreBackend::Supabase => (
                    Arc::new(SupabaseAppointmentStore::new(&config)),
                    Arc::new(SupabaseClinicSettings::new(&config)),
                ),
                StoreBackend::Memory => (
                    Arc::new(InMemoryAppointmentStore::new()),
                    Arc::new(StaticClinicSettings::new(
                        SchedulingContext::default().with_clinic_offset(configured_offset(&config)),
                    )),
                ),
            };

        Self::new(config, store, settings)
    }
}

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    pub practitioner_id: Option<Uuid>,
    pub from: Timestamp,
    pub to: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForceQuery {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct OpenQuery {
    pub at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct NextSlotQuery {
    pub practitioner_id: Uuid,
    pub from: Timestamp,
    pub service_type: ServiceType,
    pub max_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub draft: AppointmentDraft,
    pub intent: UserIntent,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAppointmentRequest {
    pub delete_reason: String,
}

// ==============================================================================
// ERROR MAPPING
// ==============================================================================

pub fn scheduling_error(error: SchedulingError) -> AppError {
    match error {
        SchedulingError::ConflictDetected(warnings) => AppError::ConfirmationRequired {
            message: format!("Slot overlaps {} existing booking(s)", warnings.len()),
            details: serde_json::to_value(&warnings).unwrap_or(Value::Null),
        },
        SchedulingError::NotFound(id) => AppError::NotFound(format!("Appointment {} not found", id)),
        SchedulingError::Validation(e) => AppError::ValidationError(e.to_string()),
        e @ SchedulingError::OutsideWorkingHours { .. } => AppError::BadRequest(e.to_string()),
        e @ SchedulingError::InvalidStatusTransition { .. } => AppError::Conflict(e.to_string()),
        e @ SchedulingError::StaleWrite { .. } => AppError::Conflict(e.to_string()),
        SchedulingError::Storage(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .scheduling
        .list_appointments(query.practitioner_id, query.from, query.to)
        .await
        .map_err(scheduling_error)?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

/// First booking phase: nothing is written.
#[axum::debug_handler]
pub async fn propose_appointment(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Json<Value>, AppError> {
    let ctx = state.settings.load_context().await;
    let proposal = state
        .scheduling
        .propose_appointment(&ctx, &draft)
        .await
        .map_err(scheduling_error)?;

    Ok(Json(json!({
        "proposal": proposal,
        "requires_confirmation": proposal.requires_confirmation()
    })))
}

#[axum::debug_handler]
pub async fn commit_appointment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForceQuery>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let ctx = state.settings.load_context().await;
    let appointment = state
        .scheduling
        .commit_appointment(&ctx, &draft, params.force)
        .await
        .map_err(scheduling_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Query(params): Query<ForceQuery>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<Value>, AppError> {
    let ctx = state.settings.load_context().await;
    let scheduled = state
        .scheduling
        .update_appointment(&ctx, appointment_id, &patch, params.force)
        .await
        .map_err(scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": scheduled.appointment,
        "warnings": scheduled.warnings
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<DeleteAppointmentRequest>,
) -> Result<StatusCode, AppError> {
    state
        .scheduling
        .delete_appointment(appointment_id, &request.delete_reason)
        .await
        .map_err(scheduling_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// SCHEDULING UTILITY HANDLERS
// ==============================================================================

/// Applies one dialog edit to a draft and reports the interval it resolves to.
#[axum::debug_handler]
pub async fn plan_reschedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<Value>, AppError> {
    let ctx = state.settings.load_context().await;
    let planner = state.scheduling.planner();

    let draft = planner.apply(&ctx, &request.draft, request.intent);
    let interval = planner.resolve_interval(&ctx, &draft).map_err(scheduling_error)?;

    Ok(Json(json!({
        "draft": draft,
        "interval": interval
    })))
}

#[axum::debug_handler]
pub async fn check_open(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OpenQuery>,
) -> Result<Json<Value>, AppError> {
    let ctx = state.settings.load_context().await;
    let open = ctx.working_hours.is_open(&query.at);
    debug!("Clinic open at {}: {}", query.at, open);

    Ok(Json(json!({
        "at": query.at,
        "open": open
    })))
}

#[axum::debug_handler]
pub async fn find_next_slot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NextSlotQuery>,
) -> Result<Json<Value>, AppError> {
    let ctx = state.settings.load_context().await;
    let slot = state
        .scheduling
        .find_next_available_slot(
            &ctx,
            query.practitioner_id,
            query.from,
            &query.service_type,
            query.max_days.unwrap_or(DEFAULT_SEARCH_DAYS),
        )
        .await
        .map_err(scheduling_error)?;

    Ok(Json(json!({
        "found": slot.is_some(),
        "slot": slot
    })))
}

#[axum::debug_handler]
pub async fn list_services(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let ctx = state.settings.load_context().await;

    Ok(Json(json!({
        "services": ctx.service_catalog.entries()
    })))
}
