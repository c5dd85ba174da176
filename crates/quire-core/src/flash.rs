//! One-shot flash messages.
//!
//! A mutation pushes a message for the acting user; the next page rendered
//! for that user takes it. Taking removes it, so a message is shown once.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::ports::{Cache, CacheError};

/// Unconsumed messages expire after this long.
const FLASH_TTL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct FlashMessages {
    cache: Arc<dyn Cache>,
}

impl FlashMessages {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    fn key(user_id: Uuid) -> String {
        format!("flash:{user_id}")
    }

    /// Queue a message for the user's next page, replacing any pending one.
    pub async fn push(&self, user_id: Uuid, message: &str) -> Result<(), CacheError> {
        self.cache
            .set(&Self::key(user_id), message, Some(FLASH_TTL))
            .await
    }

    /// Consume the pending message, if any.
    pub async fn take(&self, user_id: Uuid) -> Option<String> {
        self.cache.take(&Self::key(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl Cache for MapCache {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.lock().await.get(key).cloned()
        }

        async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<(), CacheError> {
            self.0.lock().await.insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.0.lock().await.remove(key);
            Ok(())
        }

        async fn take(&self, key: &str) -> Option<String> {
            self.0.lock().await.remove(key)
        }
    }

    #[tokio::test]
    async fn test_message_is_consumed_once() {
        let flash = FlashMessages::new(Arc::new(MapCache::default()));
        let user = Uuid::new_v4();

        flash.push(user, "Post created successfully.").await.unwrap();

        assert_eq!(flash.take(user).await.as_deref(), Some("Post created successfully."));
        assert_eq!(flash.take(user).await, None);
    }

    #[tokio::test]
    async fn test_messages_are_per_user() {
        let flash = FlashMessages::new(Arc::new(MapCache::default()));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        flash.push(alice, "first").await.unwrap();
        flash.push(alice, "second").await.unwrap();

        assert_eq!(flash.take(bob).await, None);
        assert_eq!(flash.take(alice).await.as_deref(), Some("second"));
    }
}
