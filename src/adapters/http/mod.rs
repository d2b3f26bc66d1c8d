//! HTTP inbound adapter.
//!
//! JSON API under `/api/v1` that drives `VideoSyncService`.

mod error;
mod extract;
mod handlers;
mod requests;

pub use error::ApiError;
pub use extract::{ValidatedJson, ValidatedQuery};

use crate::application::VideoSyncService;
use crate::ports::{VideoProvider, VideoRepository};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub const API_PREFIX: &str = "/api/v1";

pub fn router<P, R>(service: Arc<VideoSyncService<P, R>>) -> Router
where
    P: VideoProvider + 'static,
    R: VideoRepository + 'static,
{
    let videos = Router::new()
        .route(
            "/videos",
            get(handlers::list_videos::<P, R>).post(handlers::create_video::<P, R>),
        )
        .route("/videos/webhook", post(handlers::status_webhook::<P, R>))
        .route("/videos/remote", get(handlers::list_remote_videos::<P, R>))
        .route(
            "/videos/:id",
            get(handlers::get_video::<P, R>)
                .post(handlers::update_video::<P, R>)
                .delete(handlers::delete_video::<P, R>),
        )
        .route(
            "/videos/:id/remote",
            get(handlers::get_remote_video::<P, R>),
        )
        .with_state(service);

    Router::new()
        .route("/health", get(handlers::health))
        .nest(API_PREFIX, videos)
}
