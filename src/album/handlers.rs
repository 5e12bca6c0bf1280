use super::{Album, AlbumError, ApiIndexResponse, ImageInfo, ImageListResponse, RefreshResponse};
use crate::AppState;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

pub async fn api_index_handler(State(app_state): State<AppState>) -> Json<ApiIndexResponse> {
    let interval_hours = app_state.album.config().refresh_interval_hours;
    let refresh_feature = if interval_hours > 0 {
        format!("Auto-refresh cache every {} hours", interval_hours)
    } else {
        "Auto-refresh disabled".to_string()
    };

    Json(ApiIndexResponse {
        message: "Google Photos Album Random Image API".to_string(),
        endpoints: vec![
            "GET /api/random - Get a random image URL from the album".to_string(),
            "GET /api/img.png - Get a random image file (serves actual image)".to_string(),
            "GET /api/images - Get all images from the album".to_string(),
            "GET /api/refresh - Refresh the image cache".to_string(),
        ],
        features: vec![refresh_feature, "CORS enabled for web access".to_string()],
    })
}

pub async fn random_image_handler(
    State(app_state): State<AppState>,
) -> Result<Json<ImageInfo>, AlbumError> {
    let image = app_state.album.store().pick_random().await?;
    Ok(Json(image))
}

pub async fn random_image_file_handler(
    State(app_state): State<AppState>,
) -> Result<Response, AlbumError> {
    let image = app_state.album.store().pick_random().await?;

    let upstream = app_state
        .album
        .source()
        .fetch_image(&image.url)
        .await
        .inspect_err(|e| error!("Failed to fetch image {}: {}", image.url, e))?;

    let mut headers = HeaderMap::new();
    if let Some(content_type) = upstream
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
    {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    if let Some(length) = upstream.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );

    Ok((StatusCode::OK, headers, Body::from_stream(upstream.body)).into_response())
}

pub async fn list_images_handler(State(app_state): State<AppState>) -> Response {
    let images = app_state.album.store().all().await;

    Json(ImageListResponse {
        images: &images,
        count: images.len(),
    })
    .into_response()
}

pub async fn refresh_handler(State(app_state): State<AppState>) -> Json<RefreshResponse> {
    let (message, count) = match app_state.album.refresh().await {
        Ok(count) => ("Image cache refreshed".to_string(), count),
        Err(e) => {
            Album::log_refresh_failure(&e);
            (
                "Image cache refresh failed, serving previously cached images".to_string(),
                app_state.album.store().len().await,
            )
        }
    };

    Json(RefreshResponse { message, count })
}
