use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::{Embedder, EmbeddingError};

/// Redis read-through cache in front of another `Embedder`.
///
/// Education requirement texts repeat across many jobs, so most education
/// embeddings are served from here. Redis failures are logged and bypassed;
/// they never fail an embedding call.
pub struct CachedEmbedder<E> {
    inner: E,
    redis: redis::Client,
    conn: OnceCell<MultiplexedConnection>,
    ttl_secs: u64,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E, redis: redis::Client, ttl_secs: u64) -> Self {
        Self {
            inner,
            redis,
            conn: OnceCell::new(),
            ttl_secs,
        }
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self
            .conn
            .get_or_try_init(|| self.redis.get_multiplexed_async_connection())
            .await
        {
            Ok(conn) => Some(conn.clone()),
            Err(e) => {
                warn!("Embedding cache unavailable, bypassing: {e}");
                None
            }
        }
    }

    async fn read(&self, key: &str) -> Option<Vec<f32>> {
        let mut conn = self.connection().await?;
        let cached: Option<String> = match conn.get(key).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Embedding cache read failed: {e}");
                return None;
            }
        };
        cached.and_then(|payload| serde_json::from_str(&payload).ok())
    }

    async fn write(&self, key: &str, vector: &[f32]) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let payload = match serde_json::to_string(vector) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to serialize embedding for cache: {e}");
                return;
            }
        };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(key, payload, self.ttl_secs)
            .await
        {
            warn!("Embedding cache write failed: {e}");
        }
    }
}

#[async_trait]
impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = cache_key(self.inner.model_name(), text);

        if let Some(vector) = self.read(&key).await {
            debug!("Embedding cache hit ({} chars)", text.len());
            return Ok(vector);
        }

        let vector = self.inner.embed(text).await?;
        self.write(&key, &vector).await;
        Ok(vector)
    }
}

/// Cache key scoped by model so a model change never serves stale vectors.
fn cache_key(model: &str, text: &str) -> String {
    format!("emb:{model}:{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_scoped_by_model() {
        assert_ne!(
            cache_key("model-a", "Required Degree BSc"),
            cache_key("model-b", "Required Degree BSc")
        );
    }

    #[test]
    fn test_cache_key_layout() {
        assert_eq!(cache_key("minilm", "BSc"), "emb:minilm:BSc");
    }
}
