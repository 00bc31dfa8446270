use crate::Summary;
use dashmap::DashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Summaries keyed by the caller-supplied URL.
#[derive(Clone)]
pub struct Cache {
    cache: Arc<DashMap<String, Summary>>,
    capacity: usize,
}

impl Cache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).map_or(100, NonZeroUsize::get);
        Self {
            cache: Arc::new(DashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub async fn get(&self, key: &str) -> Option<Summary> {
        self.cache.get(key).map(|entry| entry.clone())
    }

    /// Inserts `value`, evicting an arbitrary entry first when the cache is full.
    pub async fn set(&self, key: String, value: Summary) {
        if !self.cache.contains_key(&key) && self.cache.len() >= self.capacity {
            let victim = self.cache.iter().next().map(|entry| entry.key().clone());
            if let Some(victim) = victim {
                self.cache.remove(&victim);
            }
        }
        self.cache.insert(key, value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
