use std::sync::{Arc, Mutex, MutexGuard};

struct Inner<T> {
    value: Option<T>,
    /// Number of values ever published
    published: u64,
}

/// Single-slot handoff where the latest value wins.
///
/// The producer overwrites whatever is there; the consumer takes the value
/// out. Values the consumer never saw are simply dropped, so a slow consumer
/// always works on the newest frame and a fast one sees each frame once.
pub struct LatestSlot<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for LatestSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: None,
                published: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panicking producer cannot leave the slot half-written
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publish a value, replacing any value not yet taken
    pub fn put(&self, value: T) {
        let mut inner = self.lock();
        inner.value = Some(value);
        inner.published += 1;
    }

    /// Take the newest value, if one arrived since the last take
    pub fn take(&self) -> Option<T> {
        self.lock().value.take()
    }

    /// Total number of values published so far
    pub fn published(&self) -> u64 {
        self.lock().published
    }
}
