use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/appointments",
            post(handlers::create_appointment).get(handlers::list_appointments),
        )
        .route(
            "/appointments/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::cancel_appointment),
        )
        .route(
            "/admin/appointments/{appointment_id}",
            delete(handlers::purge_appointment),
        )
        .route("/doctor/{doctor_id}/free-slots", get(handlers::get_free_slots))
        .with_state(state)
}
