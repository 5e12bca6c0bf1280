use super::{AlbumError, ImageInfo};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::RwLock;

/// Immutable view of the cached images at one point in time.
pub type Snapshot = Arc<Vec<ImageInfo>>;

/// Holds the current image list.
///
/// Every replace publishes a freshly built `Arc`, so a reader either holds the
/// previous snapshot or the new one and never a half-written list.
pub struct ImageStore {
    snapshot: RwLock<Snapshot>,
    rng: Mutex<StdRng>,
}

impl ImageStore {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Vec::new())),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub async fn replace(&self, images: Vec<ImageInfo>) {
        let next = Arc::new(images);
        *self.snapshot.write().await = next;
    }

    pub async fn all(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.snapshot.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn pick_random(&self) -> Result<ImageInfo, AlbumError> {
        let snapshot = self.all().await;
        if snapshot.is_empty() {
            return Err(AlbumError::EmptyCache);
        }

        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.random_range(0..snapshot.len())
        };

        Ok(snapshot[index].clone())
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn image(n: usize) -> ImageInfo {
        ImageInfo {
            url: format!("https://lh3.googleusercontent.com/pw/img{}", n),
            filename: format!("img{}", n),
        }
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = ImageStore::new();
        assert!(store.is_empty().await);
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_pick_random_on_empty_store() {
        let store = ImageStore::with_seed(7);
        for _ in 0..10 {
            assert!(matches!(
                store.pick_random().await,
                Err(AlbumError::EmptyCache)
            ));
        }
    }

    #[tokio::test]
    async fn test_pick_random_returns_cached_item() {
        let store = ImageStore::with_seed(42);
        store.replace((0..5).map(image).collect()).await;

        let all = store.all().await;
        let mut picked = HashSet::new();
        for _ in 0..200 {
            let choice = store.pick_random().await.unwrap();
            assert!(all.contains(&choice));
            picked.insert(choice.url);
        }
        // 200 uniform draws over 5 items cover all of them.
        assert_eq!(picked.len(), 5);
    }

    #[tokio::test]
    async fn test_replace_swaps_whole_list() {
        let store = ImageStore::new();
        store.replace(vec![image(1), image(2)]).await;
        let before = store.all().await;

        store.replace(vec![image(3)]).await;

        // The old snapshot is untouched by the replace.
        assert_eq!(*before, vec![image(1), image(2)]);
        assert_eq!(*store.all().await, vec![image(3)]);

        store.replace(Vec::new()).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_never_see_partial_snapshot() {
        let store = Arc::new(ImageStore::new());
        let generations: Vec<Vec<ImageInfo>> = (0..20)
            .map(|g| (0..(g % 7 + 1)).map(|i| image(g * 100 + i)).collect())
            .collect();
        let valid: Arc<Vec<Vec<ImageInfo>>> = Arc::new(
            std::iter::once(Vec::new())
                .chain(generations.iter().cloned())
                .collect(),
        );

        let mut tasks = Vec::new();
        for generation in generations {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.replace(generation).await;
            }));
        }
        for _ in 0..8 {
            let store = store.clone();
            let valid = valid.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let seen = store.all().await;
                    assert!(valid.iter().any(|g| *g == *seen));
                    tokio::task::yield_now().await;
                }
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }

        let last = store.all().await;
        assert!(valid.iter().any(|g| *g == *last));
    }
}
