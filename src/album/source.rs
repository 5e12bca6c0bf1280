use super::AlbumError;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{StreamExt, TryStreamExt, stream::BoxStream};
use reqwest::{
    Client, Response,
    header::{CONTENT_LENGTH, CONTENT_TYPE},
};
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub type ByteStream = BoxStream<'static, Result<Bytes, AlbumError>>;

/// Upstream image body plus the headers worth passing on to the client.
pub struct ImageStream {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

/// Where album pages and image bytes come from.
#[async_trait]
pub trait AlbumSource: Send + Sync {
    async fn fetch_album_page(&self, url: &str) -> Result<String, AlbumError>;

    async fn fetch_image(&self, url: &str) -> Result<ImageStream, AlbumError>;
}

/// Fetches over plain HTTP with the transport's default timeouts.
#[derive(Clone)]
pub struct HttpAlbumSource {
    client: Client,
}

impl HttpAlbumSource {
    pub fn new() -> Result<Self, AlbumError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, url: &str) -> Result<Response, AlbumError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AlbumError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl AlbumSource for HttpAlbumSource {
    async fn fetch_album_page(&self, url: &str) -> Result<String, AlbumError> {
        let response = self.get(url).await?;
        Ok(response.text().await?)
    }

    async fn fetch_image(&self, url: &str) -> Result<ImageStream, AlbumError> {
        let response = self.get(url).await?;
        let headers = response.headers();

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let content_length = headers
            .get(CONTENT_LENGTH)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.parse::<u64>().ok());

        let body = response.bytes_stream().map_err(AlbumError::from).boxed();

        Ok(ImageStream {
            content_type,
            content_length,
            body,
        })
    }
}
