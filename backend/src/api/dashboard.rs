use crate::models::DashboardResponse;
use crate::services::dashboard_service;
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/")]
pub async fn get_dashboard(state: &State<AppState>) -> Json<DashboardResponse> {
    Json(dashboard_service::get_dashboard(state))
}

#[get("/")]
pub fn health() -> &'static str {
    "ok"
}
