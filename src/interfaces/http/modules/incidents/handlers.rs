//! Incident HTTP handlers
//!
//! Uploaded images are decoded from base64, written under the configured
//! upload directory and served statically; only the public URL is stored
//! on the incident record.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use tracing::warn;

use crate::domain::incident::{Incident, IncidentSeverity, IncidentStatus};
use crate::domain::{DomainError, RepositoryProvider};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::notifications::{Event, IncidentReportedEvent, SharedEventBus};

use super::dto::*;

/// Application state for incident handlers.
#[derive(Clone)]
pub struct IncidentAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub event_bus: SharedEventBus,
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Public URL prefix the upload dir is served under
    pub public_prefix: String,
}

/// Allowed upload extensions; anything else falls back to jpg.
fn safe_ext(ext: Option<&str>) -> &str {
    match ext {
        Some("png") => "png",
        Some("gif") => "gif",
        Some("webp") => "webp",
        _ => "jpg",
    }
}

async fn store_image(
    state: &IncidentAppState,
    incident_id: &str,
    image_base64: &str,
    ext: Option<&str>,
) -> Result<String, DomainError> {
    let bytes = BASE64
        .decode(image_base64)
        .map_err(|_| DomainError::Validation("image_base64 is not valid base64".to_string()))?;

    let file_name = format!("incident-{}.{}", incident_id, safe_ext(ext));
    let path = state.upload_dir.join(&file_name);

    if let Err(e) = tokio::fs::create_dir_all(&state.upload_dir).await {
        warn!("Cannot create upload dir {:?}: {}", state.upload_dir, e);
        return Err(DomainError::Validation("image storage unavailable".to_string()));
    }
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| DomainError::Validation(format!("cannot store image: {e}")))?;

    Ok(format!("{}/{}", state.public_prefix.trim_end_matches('/'), file_name))
}

#[utoipa::path(
    post,
    path = "/api/v1/incidents",
    tag = "Incidents",
    security(("bearer_auth" = [])),
    request_body = ReportIncidentRequest,
    responses(
        (status = 201, description = "Incident reported", body = ApiResponse<IncidentDto>),
        (status = 400, description = "Invalid image payload")
    )
)]
pub async fn report_incident(
    State(state): State<IncidentAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ReportIncidentRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<IncidentDto>>),
    (StatusCode, Json<ApiResponse<IncidentDto>>),
> {
    let id = uuid::Uuid::new_v4().to_string();

    let image_url = match request.image_base64.as_deref() {
        Some(data) => Some(
            store_image(&state, &id, data, request.image_ext.as_deref())
                .await
                .map_err(domain_error_response)?,
        ),
        None => None,
    };

    let now = Utc::now();
    let incident = Incident {
        id,
        title: request.title,
        description: request.description,
        severity: request
            .severity
            .as_deref()
            .map(IncidentSeverity::from_str)
            .unwrap_or(IncidentSeverity::Medium),
        status: IncidentStatus::Open,
        location: request.location,
        reported_by: auth.user_id,
        image_url,
        created_at: now,
        updated_at: now,
    };

    state
        .repos
        .incidents()
        .save(incident.clone())
        .await
        .map_err(domain_error_response)?;

    state
        .event_bus
        .publish(Event::IncidentReported(IncidentReportedEvent {
            incident_id: incident.id.clone(),
            severity: incident.severity.as_str().to_string(),
            location: incident.location.clone(),
            timestamp: now,
        }));

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(IncidentDto::from_domain(incident))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/incidents",
    tag = "Incidents",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All incidents", body = ApiResponse<Vec<IncidentDto>>)
    )
)]
pub async fn list_incidents(
    State(state): State<IncidentAppState>,
) -> Result<Json<ApiResponse<Vec<IncidentDto>>>, (StatusCode, Json<ApiResponse<Vec<IncidentDto>>>)>
{
    let incidents = state
        .repos
        .incidents()
        .find_all()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        incidents.into_iter().map(IncidentDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/v1/incidents/{id}/status",
    tag = "Incidents",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Incident ID")),
    request_body = UpdateIncidentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<IncidentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_incident_status(
    State(state): State<IncidentAppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateIncidentStatusRequest>,
) -> Result<Json<ApiResponse<IncidentDto>>, (StatusCode, Json<ApiResponse<IncidentDto>>)> {
    let incident = state
        .repos
        .incidents()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?;

    let Some(mut incident) = incident else {
        return Err(domain_error_response(DomainError::NotFound {
            entity: "Incident",
            field: "id",
            value: id,
        }));
    };

    incident.status = IncidentStatus::from_str(&request.status);
    incident.updated_at = Utc::now();

    state
        .repos
        .incidents()
        .update(incident.clone())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(IncidentDto::from_domain(incident))))
}
