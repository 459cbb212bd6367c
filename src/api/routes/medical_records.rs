//! `/api/medical-records`

use crate::api::error::{ApiError, ApiJson, ApiResult};
use crate::api::responses::{DeletedResponse, InsertedResponse, UpdatedResponse};
use crate::api::AppState;
use crate::domain::{MedicalRecord, MedicalRecordUpdate, NewMedicalRecord, PatientId, RecordId};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/patient/:patient_id", get(list_records_for_patient))
        .route(
            "/:record_id",
            get(get_record).put(update_record).delete(delete_record),
        )
}

fn unprocessable(e: impl ToString) -> ApiError {
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}

fn not_found(id: &RecordId) -> ApiError {
    ApiError::not_found(format!("Medical record {id} not found"))
}

async fn ensure_patient(state: &AppState, patient_id: &PatientId) -> ApiResult<()> {
    if state.store.get_patient(patient_id).await?.is_none() {
        return Err(ApiError::not_found(format!("Patient {patient_id} not found")));
    }
    Ok(())
}

async fn create_record(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewMedicalRecord>,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let record = request.into_record()?;
    ensure_patient(&state, &record.patient_id).await?;
    state.store.insert_record(&record).await?;
    tracing::info!(record_id = %record.record_id, patient_id = %record.patient_id, "Medical record created");
    Ok((
        StatusCode::CREATED,
        Json(InsertedResponse::new("Medical record", record.record_id.as_str())),
    ))
}

async fn list_records(State(state): State<AppState>) -> ApiResult<Json<Vec<MedicalRecord>>> {
    Ok(Json(state.store.list_records().await?))
}

async fn list_records_for_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Vec<MedicalRecord>>> {
    let patient_id = PatientId::new(patient_id).map_err(unprocessable)?;
    let records = state.store.list_records_for_patient(&patient_id).await?;
    if records.is_empty() {
        return Err(ApiError::not_found(format!(
            "No medical records found for patient {patient_id}"
        )));
    }
    Ok(Json(records))
}

async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<MedicalRecord>> {
    let id = RecordId::new(record_id).map_err(unprocessable)?;
    let record = state
        .store
        .get_record(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(record))
}

async fn update_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    ApiJson(update): ApiJson<MedicalRecordUpdate>,
) -> ApiResult<Json<UpdatedResponse>> {
    let id = RecordId::new(record_id).map_err(unprocessable)?;
    let current = state
        .store
        .get_record(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let updated = update.apply(&current)?;
    if updated.patient_id != current.patient_id {
        ensure_patient(&state, &updated.patient_id).await?;
    }
    let modified = updated != current;
    if modified && !state.store.replace_record(&updated).await? {
        return Err(not_found(&id));
    }
    Ok(Json(UpdatedResponse::new("Medical record", modified)))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = RecordId::new(record_id).map_err(unprocessable)?;
    if !state.store.delete_record(&id).await? {
        return Err(not_found(&id));
    }
    Ok(Json(DeletedResponse::new("Medical record")))
}
