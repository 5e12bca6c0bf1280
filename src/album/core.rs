use super::{Album, AlbumError, SharedAlbum, album_page_url, extract_album_id, extract_image_urls};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Longest period the scheduler will wait between cycles.
pub const MAX_REFRESH_INTERVAL_HOURS: u64 = 24 * 366;

pub(crate) fn refresh_period(interval_hours: u64) -> Duration {
    let hours = interval_hours.min(MAX_REFRESH_INTERVAL_HOURS);
    Duration::from_secs(hours.saturating_mul(60 * 60))
}

impl Album {
    /// Runs one fetch, extract and replace cycle.
    ///
    /// On any error the cached images are left as they were. A page without
    /// matching images still replaces the cache with an empty list.
    pub async fn refresh(&self) -> Result<usize, AlbumError> {
        let _guard = self.refresh_lock.lock().await;
        info!("Refreshing image cache...");

        let album_id = extract_album_id(&self.config.album_url)
            .ok_or_else(|| AlbumError::NoIdentifier(self.config.album_url.clone()))?;

        let page_url = album_page_url(album_id);
        let html = self.source.fetch_album_page(&page_url).await?;

        let images = extract_image_urls(&html);
        let count = images.len();
        self.store.replace(images).await;

        info!("Cached {} images", count);
        Ok(count)
    }

    /// Logs a failed refresh. The cache keeps serving its previous contents.
    pub fn log_refresh_failure(e: &AlbumError) {
        match e {
            AlbumError::NoIdentifier(_) => warn!("{}", e),
            _ => error!("Error refreshing album: {}", e),
        }
    }

    pub fn start_background_refresh(
        album: SharedAlbum,
        interval_hours: u64,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresh_period(interval_hours));
            interval.tick().await; // Startup refresh already ran

            info!(
                "Auto-refresh started: cache will refresh every {} hours",
                interval_hours
            );

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Auto-refresh stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        info!("Auto-refreshing image cache...");
                        if let Err(e) = album.refresh().await {
                            Album::log_refresh_failure(&e);
                        }
                    }
                }
            }
        })
    }
}
