//! `/api/patients`

use crate::api::error::{ApiError, ApiJson, ApiResult};
use crate::api::responses::{DeletedResponse, InsertedResponse, UpdatedResponse};
use crate::api::AppState;
use crate::domain::{NewPatient, Patient, PatientId, PatientUpdate};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route(
            "/:patient_id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
}

fn parse_id(raw: &str) -> ApiResult<PatientId> {
    PatientId::new(raw).map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

fn not_found(id: &PatientId) -> ApiError {
    ApiError::not_found(format!("Patient {id} not found"))
}

async fn create_patient(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewPatient>,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let patient = request.into_patient()?;
    state.store.insert_patient(&patient).await?;
    tracing::info!(patient_id = %patient.patient_id, "Patient created");
    Ok((
        StatusCode::CREATED,
        Json(InsertedResponse::new("Patient", patient.patient_id.as_str())),
    ))
}

async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(state.store.list_patients().await?))
}

async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Patient>> {
    let id = parse_id(&patient_id)?;
    let patient = state
        .store
        .get_patient(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(patient))
}

async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    ApiJson(update): ApiJson<PatientUpdate>,
) -> ApiResult<Json<UpdatedResponse>> {
    let id = parse_id(&patient_id)?;
    let current = state
        .store
        .get_patient(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let updated = update.apply(&current)?;
    let modified = updated != current;
    if modified && !state.store.replace_patient(&updated).await? {
        return Err(not_found(&id));
    }
    Ok(Json(UpdatedResponse::new("Patient", modified)))
}

async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_id(&patient_id)?;
    if !state.store.delete_patient(&id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(patient_id = %id, "Patient deleted");
    Ok(Json(DeletedResponse::new("Patient")))
}
