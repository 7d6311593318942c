// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::handlers::{self, AppState};

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Appointment management, two-phase booking
        .route("/appointments", get(handlers::list_appointments).post(handlers::commit_appointment))
        .route("/appointments/propose", post(handlers::propose_appointment))
        .route(
            "/appointments/{appointment_id}",
            patch(handlers::update_appointment).delete(handlers::delete_appointment),
        )

        // Scheduling utilities
        .route("/schedule/plan", post(handlers::plan_reschedule))
        .route("/schedule/open", get(handlers::check_open))
        .route("/schedule/next-slot", get(handlers::find_next_slot))
        .route("/services", get(handlers::list_services))

        .with_state(state)
}
