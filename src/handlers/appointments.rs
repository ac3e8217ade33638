// handlers/appointments.rs - /api/appointments : public booking requests and
// their admin management

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{admin_only, find_or_404};
use crate::app::AppState;
use crate::database::models::{Appointment, AppointmentStatus, MeetingType};
use crate::database::Document;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::forms::{de, FormPayload};
use crate::middleware::{ApiResponse, ApiResult};

const NOT_FOUND: &str = "Appointment not found";

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/api/appointments", post(create_appointment));

    let admin = Router::new()
        .route("/api/appointments", get(list_appointments))
        .route("/api/appointments/stats", get(stats))
        .route(
            "/api/appointments/:id",
            get(get_appointment).put(update_appointment).delete(delete_appointment),
        );

    public.merge(admin_only(state, admin))
}

/// A complete booking request. Dates in the past are accepted.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentForm {
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Please provide client name"))]
    pub client_name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(
        required(message = "Please provide email"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Please provide phone number"))]
    pub phone: Option<String>,
    #[serde(deserialize_with = "de::opt_parsed")]
    #[validate(required(message = "Please select meeting type"))]
    pub meeting_type: Option<MeetingType>,
    #[serde(deserialize_with = "de::opt_date")]
    #[validate(required(message = "Please provide preferred date"))]
    pub preferred_date: Option<NaiveDate>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Please provide preferred time"))]
    pub preferred_time: Option<String>,
    #[serde(deserialize_with = "de::opt_date")]
    pub alternate_date: Option<NaiveDate>,
    #[serde(deserialize_with = "de::opt_string")]
    pub alternate_time: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Please specify service interest"))]
    pub service_interest: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub message: Option<String>,
}

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    payload: FormPayload<AppointmentForm>,
) -> ApiResult<Appointment> {
    let form = payload.data;
    form.validate()?;

    let (
        Some(client_name),
        Some(email),
        Some(phone),
        Some(meeting_type),
        Some(preferred_date),
        Some(preferred_time),
        Some(service_interest),
    ) = (
        form.client_name,
        form.email,
        form.phone,
        form.meeting_type,
        form.preferred_date,
        form.preferred_time,
        form.service_interest,
    )
    else {
        return Err(ApiError::bad_request("Missing required booking details"));
    };

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        client_name,
        company_name: form.company_name,
        email: email.to_lowercase(),
        phone,
        meeting_type,
        preferred_date,
        preferred_time,
        alternate_date: form.alternate_date,
        alternate_time: form.alternate_time,
        service_interest,
        message: form.message,
        status: AppointmentStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    let appointment = state.store.appointments.insert(appointment).await?;
    info!(
        appointment_id = %appointment.id,
        meeting_type = %appointment.meeting_type,
        date = %appointment.preferred_date,
        "Appointment requested"
    );
    state.notifier.appointment_requested(&appointment).await;

    Ok(ApiResponse::created(appointment)
        .message("Appointment request submitted successfully. We will confirm shortly."))
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub status: Option<String>,
}

/// GET /api/appointments?status=
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> ApiResult<Vec<Appointment>> {
    let status = query.status.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let filter = Filter::new().where_opt("status", status).order("created_at desc");
    let appointments = state.store.appointments.select_any(filter).await?;
    Ok(ApiResponse::list(appointments))
}

#[derive(Debug, Default, Serialize)]
pub struct AppointmentStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub completed: i64,
}

/// GET /api/appointments/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<AppointmentStats> {
    let mut stats = AppointmentStats::default();
    for status in AppointmentStatus::ALL {
        let count = state
            .store
            .appointments
            .count(Filter::new().where_eq("status", *status))
            .await?;
        match status {
            AppointmentStatus::Pending => stats.pending = count,
            AppointmentStatus::Confirmed => stats.confirmed = count,
            AppointmentStatus::Cancelled => stats.cancelled = count,
            AppointmentStatus::Completed => stats.completed = count,
        }
        stats.total += count;
    }
    Ok(ApiResponse::success(stats))
}

/// GET /api/appointments/:id
pub async fn get_appointment(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Appointment> {
    let appointment = find_or_404(state.store.appointments.as_ref(), &id, NOT_FOUND).await?;
    Ok(ApiResponse::success(appointment))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentUpdate {
    #[serde(deserialize_with = "de::opt_parsed")]
    pub status: Option<AppointmentStatus>,
    #[serde(deserialize_with = "de::opt_string")]
    pub client_name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "de::opt_parsed")]
    pub meeting_type: Option<MeetingType>,
    #[serde(deserialize_with = "de::opt_date")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(deserialize_with = "de::opt_string")]
    pub preferred_time: Option<String>,
    #[serde(deserialize_with = "de::opt_date")]
    pub alternate_date: Option<NaiveDate>,
    #[serde(deserialize_with = "de::opt_string")]
    pub alternate_time: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub service_interest: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub message: Option<String>,
}

/// PUT /api/appointments/:id - only the fields sent are changed.
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: FormPayload<AppointmentUpdate>,
) -> ApiResult<Appointment> {
    let mut appointment = find_or_404(state.store.appointments.as_ref(), &id, NOT_FOUND).await?;
    let update = payload.data;
    update.validate()?;

    if let Some(status) = update.status {
        appointment.status = status;
    }
    if let Some(v) = update.client_name {
        appointment.client_name = v;
    }
    if let Some(v) = update.company_name {
        appointment.company_name = Some(v);
    }
    if let Some(v) = update.email {
        appointment.email = v.to_lowercase();
    }
    if let Some(v) = update.phone {
        appointment.phone = v;
    }
    if let Some(v) = update.meeting_type {
        appointment.meeting_type = v;
    }
    if let Some(v) = update.preferred_date {
        appointment.preferred_date = v;
    }
    if let Some(v) = update.preferred_time {
        appointment.preferred_time = v;
    }
    if let Some(v) = update.alternate_date {
        appointment.alternate_date = Some(v);
    }
    if let Some(v) = update.alternate_time {
        appointment.alternate_time = Some(v);
    }
    if let Some(v) = update.service_interest {
        appointment.service_interest = v;
    }
    if let Some(v) = update.message {
        appointment.message = Some(v);
    }

    appointment.touch(Utc::now());
    let appointment = state.store.appointments.update(appointment).await?;
    Ok(ApiResponse::success(appointment))
}

/// DELETE /api/appointments/:id
pub async fn delete_appointment(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let appointment = find_or_404(state.store.appointments.as_ref(), &id, NOT_FOUND).await?;
    state.store.appointments.delete(appointment.id).await?;
    Ok(ApiResponse::message_only("Appointment deleted successfully"))
}
