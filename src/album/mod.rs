// Album module - scraping, caching and the refresh scheduler
mod core;
mod error;
mod extract;
mod handlers;
mod source;
mod store;
mod types;

pub use self::core::MAX_REFRESH_INTERVAL_HOURS;
pub use error::AlbumError;
pub use extract::{
    DEFAULT_FILENAME, album_page_url, extract_album_id, extract_filename, extract_image_urls,
};
pub use handlers::{
    api_index_handler, list_images_handler, random_image_file_handler, random_image_handler,
    refresh_handler,
};
pub use source::{AlbumSource, ByteStream, HttpAlbumSource, ImageStream};
pub use store::{ImageStore, Snapshot};
pub use types::*;

use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedAlbum = Arc<Album>;

pub struct Album {
    pub(crate) config: AlbumConfig,
    pub(crate) source: Arc<dyn AlbumSource>,
    pub(crate) store: ImageStore,
    // Held for the whole of a refresh cycle so overlapping triggers run one after another.
    pub(crate) refresh_lock: Mutex<()>,
}

impl Album {
    pub fn new(config: AlbumConfig, source: Arc<dyn AlbumSource>) -> Self {
        Self::with_store(config, source, ImageStore::new())
    }

    pub fn with_store(
        config: AlbumConfig,
        source: Arc<dyn AlbumSource>,
        store: ImageStore,
    ) -> Self {
        Self {
            config,
            source,
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &AlbumConfig {
        &self.config
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn source(&self) -> &Arc<dyn AlbumSource> {
        &self.source
    }
}
