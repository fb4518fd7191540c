//! Content-hash keyed vector cache.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use repurx_common::{RepurxError, Result};
use sha2::{Digest, Sha256};

use crate::embedder::TextEmbedder;

type Key = [u8; 32];

/// In-memory LRU of text vectors keyed by the SHA-256 of the input text.
///
/// Lives outside any snapshot so that a reload re-embeds only texts that
/// actually changed. A capacity of zero disables caching.
pub struct EmbeddingCache {
    entries: Option<Mutex<LruCache<Key, Arc<[f32]>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn key(text: &str) -> Key {
        let digest = Sha256::digest(text.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        key
    }

    pub fn get(&self, text: &str) -> Option<Arc<[f32]>> {
        let entries = self.entries.as_ref()?;
        let found = lock(entries).get(&Self::key(text)).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn put(&self, text: &str, vector: Arc<[f32]>) {
        if let Some(entries) = &self.entries {
            lock(entries).put(Self::key(text), vector);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| lock(e).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            lock(entries).clear();
        }
    }
}

// Cached vectors are immutable once inserted; a poisoned lock is recovered.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Wraps an embedder with an [`EmbeddingCache`].
pub struct CachedEmbedder<E> {
    inner: E,
    cache: Arc<EmbeddingCache>,
}

impl<E: TextEmbedder> CachedEmbedder<E> {
    pub fn new(inner: E, capacity: usize) -> Self {
        Self::with_cache(inner, Arc::new(EmbeddingCache::new(capacity)))
    }

    pub fn with_cache(inner: E, cache: Arc<EmbeddingCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: TextEmbedder> TextEmbedder for CachedEmbedder<E> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.cache.get(text) {
            return Ok(hit.to_vec());
        }
        let vector = self.inner.embed(text)?;
        self.cache.put(text, Arc::from(vector.as_slice()));
        Ok(vector)
    }

    /// Only texts missing from the cache reach the inner embedder, in one batch.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut out: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut missing_idx = Vec::new();
        let mut missing = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            match self.cache.get(text) {
                Some(hit) => out.push(Some(hit.to_vec())),
                None => {
                    out.push(None);
                    missing_idx.push(i);
                    missing.push(*text);
                }
            }
        }

        if !missing.is_empty() {
            let fresh = self.inner.embed_batch(&missing)?;
            if fresh.len() != missing.len() {
                return Err(RepurxError::Embedding(format!(
                    "{} returned {} vectors for {} texts",
                    self.inner.name(),
                    fresh.len(),
                    missing.len()
                )));
            }
            for ((i, text), vector) in missing_idx.into_iter().zip(missing).zip(fresh) {
                self.cache.put(text, Arc::from(vector.as_slice()));
                out[i] = Some(vector);
            }
        }

        Ok(out.into_iter().flatten().collect())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashingEmbedder;
    use std::sync::atomic::AtomicUsize;

    struct Counting {
        calls: AtomicUsize,
        inner: HashingEmbedder,
    }

    impl TextEmbedder for Counting {
        fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(text)
        }
    }

    fn counting() -> Counting {
        Counting { calls: AtomicUsize::new(0), inner: HashingEmbedder::new(32) }
    }

    #[test]
    fn test_repeat_text_hits_cache() {
        let embedder = CachedEmbedder::new(counting(), 8);
        let a = embedder.embed("insulin resistance").unwrap();
        let b = embedder.embed("insulin resistance").unwrap();
        assert_eq!(a, b);
        assert_eq!(embedder.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(embedder.cache().hits(), 1);
        assert_eq!(embedder.cache().misses(), 1);
    }

    #[test]
    fn test_batch_only_embeds_missing() {
        let embedder = CachedEmbedder::new(counting(), 8);
        embedder.embed("alpha beta").unwrap();
        let out = embedder.embed_batch(&["gamma delta", "alpha beta", "epsilon"]).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], embedder.inner().inner.embed("alpha beta").unwrap());
        assert_eq!(embedder.inner().calls.load(Ordering::SeqCst), 3);
        assert_eq!(embedder.cache().len(), 3);
    }

    #[test]
    fn test_lru_evicts_oldest() {
        let cache = EmbeddingCache::new(2);
        cache.put("a", Arc::from(vec![1.0f32].as_slice()));
        cache.put("b", Arc::from(vec![2.0f32].as_slice()));
        cache.put("c", Arc::from(vec![3.0f32].as_slice()));
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("c").as_deref(), Some([3.0f32].as_slice()));
    }

    #[test]
    fn test_zero_capacity_disables() {
        let embedder = CachedEmbedder::new(counting(), 0);
        embedder.embed("x y z").unwrap();
        embedder.embed("x y z").unwrap();
        assert_eq!(embedder.inner().calls.load(Ordering::SeqCst), 2);
        assert!(embedder.cache().is_empty());
    }

    #[test]
    fn test_shared_cache_survives_wrapper() {
        let cache = Arc::new(EmbeddingCache::new(4));
        CachedEmbedder::with_cache(HashingEmbedder::new(8), cache.clone())
            .embed("metformin")
            .unwrap();
        assert_eq!(cache.len(), 1);
    }
}
