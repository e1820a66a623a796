//! HTTP client for an OpenAI-compatible embeddings endpoint
//! (text-embeddings-inference, vLLM, OpenAI itself).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{l2_normalize, Embedder, EmbeddingError};

const EMBEDDINGS_PATH: &str = "/v1/embeddings";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
}

impl EmbeddingClient {
    pub fn new(base_url: &str, api_key: Option<String>, model: String, dimensions: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: embeddings_endpoint(base_url),
            api_key,
            model,
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embeds a batch of texts, returning vectors in input order.
    /// Retries on 429 and 5xx with exponential backoff.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: EmbeddingResponse = response.json().await?;
            let vectors = self.finish_vectors(parsed, texts.len())?;

            debug!(
                "Embedding call succeeded: {} inputs, dimension {}",
                texts.len(),
                self.dimensions
            );

            return Ok(vectors);
        }

        Err(last_error.unwrap_or(EmbeddingError::Unavailable(format!(
            "no response after {MAX_RETRIES} attempts"
        ))))
    }

    /// Orders by `index`, checks count and dimension, and L2-normalizes.
    fn finish_vectors(
        &self,
        mut response: EmbeddingResponse,
        expected_count: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if response.data.len() != expected_count || response.data.is_empty() {
            return Err(EmbeddingError::Empty);
        }

        response.data.sort_by_key(|d| d.index);

        response
            .data
            .into_iter()
            .map(|d| {
                let mut vector = d.embedding;
                if vector.len() != self.dimensions {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: vector.len(),
                    });
                }
                l2_normalize(&mut vector);
                Ok(vector)
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::Empty)
    }
}

/// Accepts either a bare host (`http://tei:8080`) or a full endpoint URL.
fn embeddings_endpoint(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with(EMBEDDINGS_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{EMBEDDINGS_PATH}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(dimensions: usize) -> EmbeddingClient {
        EmbeddingClient::new("http://localhost:8080", None, "test-model".into(), dimensions)
    }

    #[test]
    fn test_endpoint_appends_path() {
        assert_eq!(
            embeddings_endpoint("http://tei:8080/"),
            "http://tei:8080/v1/embeddings"
        );
    }

    #[test]
    fn test_endpoint_keeps_full_url() {
        assert_eq!(
            embeddings_endpoint("https://api.example.com/v1/embeddings"),
            "https://api.example.com/v1/embeddings"
        );
    }

    #[test]
    fn test_finish_vectors_orders_by_index_and_normalizes() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"data": [
                {"embedding": [0.0, 2.0], "index": 1},
                {"embedding": [3.0, 4.0], "index": 0}
            ]}"#,
        )
        .unwrap();

        let vectors = client(2).finish_vectors(response, 2).unwrap();
        assert!((vectors[0][0] - 0.6).abs() < 1e-6);
        assert!((vectors[1][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_finish_vectors_rejects_wrong_dimension() {
        let response: EmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"embedding": [1.0, 2.0, 3.0], "index": 0}]}"#)
                .unwrap();

        let err = client(2).finish_vectors(response, 1).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_finish_vectors_rejects_missing_vectors() {
        let response: EmbeddingResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(matches!(
            client(2).finish_vectors(response, 1),
            Err(EmbeddingError::Empty)
        ));
    }
}
