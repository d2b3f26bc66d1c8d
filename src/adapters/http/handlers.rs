//! Axum handlers for the video routes.

use super::error::ApiError;
use super::extract::{ValidatedJson, ValidatedQuery};
use super::requests::{
    parse_remote_id, CreateVideoRequest, RemotePageQuery, StatusWebhookRequest, UpdateVideoRequest,
    VideoKey,
};
use crate::application::{VideoSyncService, WebhookOutcome};
use crate::ports::{VideoProvider, VideoRepository};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub type AppState<P, R> = State<Arc<VideoSyncService<P, R>>>;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_video<P, R>(
    State(service): AppState<P, R>,
    ValidatedJson(req): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let created = service.create_video(req.into_command()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Video created successfully",
            "data": created.record,
            "fetch": created.fetch,
        })),
    ))
}

pub async fn list_videos<P, R>(State(service): AppState<P, R>) -> Result<Json<Value>, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let videos = service.list_videos().await?;
    Ok(Json(json!({
        "success": true,
        "count": videos.len(),
        "data": videos,
    })))
}

pub async fn get_video<P, R>(
    State(service): AppState<P, R>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let record = match VideoKey::parse(&id)? {
        VideoKey::Remote(remote_id) => service.get_video(&remote_id).await?,
        VideoKey::Local(local_id) => service.get_video_by_local_id(local_id).await?,
    };
    Ok(Json(json!({ "success": true, "data": record })))
}

pub async fn update_video<P, R>(
    State(service): AppState<P, R>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateVideoRequest>,
) -> Result<Json<Value>, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let remote_id = parse_remote_id(&id)?;
    let record = service.update_video(&remote_id, req.into()).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Video updated successfully",
        "data": record,
    })))
}

pub async fn delete_video<P, R>(
    State(service): AppState<P, R>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let remote_id = parse_remote_id(&id)?;
    let removed = service.delete_video(&remote_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Video deleted successfully",
        "data": removed,
    })))
}

/// Provider callback. Once the payload validates, the provider always gets a
/// 200 so it does not retry; failures are reported in the body.
pub async fn status_webhook<P, R>(
    State(service): AppState<P, R>,
    ValidatedJson(req): ValidatedJson<StatusWebhookRequest>,
) -> Result<Json<Value>, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let library_id = req.video_library_id;
    let (remote_id, code) = req.into_parts()?;

    if let Some(library_id) = library_id {
        let expected = service.provider().library_id();
        if library_id.to_string() != expected {
            warn!(
                remote_id = %remote_id,
                library_id,
                expected = %expected,
                "Webhook for another library"
            );
        }
    }

    let body = match service.handle_status_webhook(&remote_id, code).await {
        Ok(WebhookOutcome::Processing { remote_id, code }) => {
            info!(remote_id = %remote_id, code, "Video still processing");
            json!({
                "success": true,
                "message": "Video is still processing",
                "data": { "videoGuid": remote_id, "status": code },
            })
        }
        Ok(WebhookOutcome::Updated(record)) => json!({
            "success": true,
            "message": "Video status updated",
            "data": record,
        }),
        Err(err) => {
            let err = ApiError::from(err);
            let (_, code, message) = err.parts();
            warn!(
                remote_id = %remote_id,
                error_code = code,
                error = %err,
                "Webhook not applied"
            );
            json!({
                "success": false,
                "message": message,
                "error_code": code,
            })
        }
    };
    Ok(Json(body))
}

pub async fn get_remote_video<P, R>(
    State(service): AppState<P, R>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let remote_id = parse_remote_id(&id)?;
    let video = service.get_remote_video(&remote_id).await?;
    Ok(Json(json!({ "success": true, "data": video })))
}

pub async fn list_remote_videos<P, R>(
    State(service): AppState<P, R>,
    ValidatedQuery(query): ValidatedQuery<RemotePageQuery>,
) -> Result<Json<Value>, ApiError>
where
    P: VideoProvider,
    R: VideoRepository,
{
    let page = service
        .list_remote_videos(query.page(), query.items_per_page())
        .await?;
    Ok(Json(json!({ "success": true, "data": page })))
}
