use serde::Serialize;

/// A single image reference scraped from the album page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct AlbumConfig {
    pub album_url: String,
    pub refresh_interval_hours: u64,
}

#[derive(Debug, Serialize)]
pub struct ImageListResponse<'a> {
    pub images: &'a [ImageInfo],
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiIndexResponse {
    pub message: String,
    pub endpoints: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
