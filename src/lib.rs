use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod album;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REFRESH_INTERVAL_HOURS: u64 = 12;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error parsing config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Album URL not found in config")]
    MissingAlbumUrl,

    #[error("refresh_interval_hours must be at most {max}, got {value}")]
    RefreshIntervalTooLarge { value: u64, max: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub album_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_refresh_interval_hours")]
    pub refresh_interval_hours: u64,
    #[serde(default = "default_static_directory")]
    pub static_directory: PathBuf,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_refresh_interval_hours() -> u64 {
    DEFAULT_REFRESH_INTERVAL_HOURS
}

fn default_static_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    pub fn new(album_url: impl Into<String>) -> Self {
        Self {
            album_url: album_url.into(),
            port: default_port(),
            host: default_host(),
            refresh_interval_hours: default_refresh_interval_hours(),
            static_directory: default_static_directory(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(content)?;

        config.album_url = config.album_url.trim().to_string();
        if config.album_url.is_empty() {
            return Err(ConfigError::MissingAlbumUrl);
        }
        if config.port == 0 {
            config.port = DEFAULT_PORT;
        }
        if config.refresh_interval_hours > album::MAX_REFRESH_INTERVAL_HOURS {
            return Err(ConfigError::RefreshIntervalTooLarge {
                value: config.refresh_interval_hours,
                max: album::MAX_REFRESH_INTERVAL_HOURS,
            });
        }

        Ok(config)
    }

    pub fn album(&self) -> album::AlbumConfig {
        album::AlbumConfig {
            album_url: self.album_url.clone(),
            refresh_interval_hours: self.refresh_interval_hours,
        }
    }
}

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub album: album::SharedAlbum,
    pub config: Config,
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Origin, Content-Type, Accept"),
    );

    response
}

pub fn create_app(app_state: AppState) -> Router {
    let static_dir = app_state.config.static_directory.clone();

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .route("/api", get(album::api_index_handler))
        .route("/api/", get(album::api_index_handler))
        .route("/api/random", get(album::random_image_handler))
        .route("/api/img.png", get(album::random_image_file_handler))
        .route("/api/images", get(album::list_images_handler))
        .route("/api/refresh", get(album::refresh_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &axum::http::Request<_>| {
                            let method = request.method();
                            let uri = request.uri();
                            let matched_path = request
                                .extensions()
                                .get::<axum::extract::MatchedPath>()
                                .map(|matched_path| matched_path.as_str());

                            tracing::info_span!(
                                "http_request",
                                method = %method,
                                uri = %uri,
                                matched_path,
                            )
                        })
                        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                            tracing::debug!(
                                target: "access_log",
                                method = %request.method(),
                                path = %request.uri().path(),
                                "request"
                            );
                        })
                        .on_response(
                            |response: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             _span: &tracing::Span| {
                                let size = response
                                    .headers()
                                    .get("content-length")
                                    .and_then(|h| h.to_str().ok())
                                    .unwrap_or("-");

                                tracing::info!(
                                    target: "access_log",
                                    status = %response.status(),
                                    size = %size,
                                    latency_ms = %latency.as_millis(),
                                    "response"
                                );
                            },
                        ),
                )
                .layer(middleware::from_fn(cors_middleware)),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_json(r#"{"album_url": "https://photos.app.goo.gl/ABC123"}"#)
            .unwrap();
        assert_eq!(config.album_url, "https://photos.app.goo.gl/ABC123");
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.refresh_interval_hours, 12);
        assert_eq!(config.static_directory, PathBuf::from("."));
    }

    #[test]
    fn test_config_zero_port_uses_default() {
        let config =
            Config::from_json(r#"{"album_url": "https://photos.app.goo.gl/x", "port": 0}"#)
                .unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_json(
            r#"{
                "album_url": "  https://photos.app.goo.gl/x  ",
                "port": 9000,
                "host": "127.0.0.1",
                "refresh_interval_hours": 1,
                "static_directory": "public"
            }"#,
        )
        .unwrap();
        assert_eq!(config.album_url, "https://photos.app.goo.gl/x");
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.refresh_interval_hours, 1);
        assert_eq!(config.static_directory, PathBuf::from("public"));
    }

    #[test]
    fn test_config_missing_album_url() {
        assert!(matches!(
            Config::from_json(r#"{"port": 8080}"#),
            Err(ConfigError::MissingAlbumUrl)
        ));
        assert!(matches!(
            Config::from_json(r#"{"album_url": "   "}"#),
            Err(ConfigError::MissingAlbumUrl)
        ));
    }

    #[test]
    fn test_config_rejects_huge_refresh_interval() {
        let result = Config::from_json(
            r#"{"album_url": "https://photos.app.goo.gl/ABC123", "refresh_interval_hours": 18446744073709551615}"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::RefreshIntervalTooLarge {
                value: u64::MAX,
                ..
            })
        ));

        let config = Config::from_json(&format!(
            r#"{{"album_url": "https://photos.app.goo.gl/ABC123", "refresh_interval_hours": {}}}"#,
            album::MAX_REFRESH_INTERVAL_HOURS
        ))
        .unwrap();
        assert_eq!(
            config.refresh_interval_hours,
            album::MAX_REFRESH_INTERVAL_HOURS
        );
    }

    #[test]
    fn test_config_invalid_json() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_missing_file() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/albumroll/config.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
