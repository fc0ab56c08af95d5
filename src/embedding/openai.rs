//! OpenAI embeddings client.

use serde::Deserialize;
use serde_json::json;

use super::EmbeddingProvider;
use crate::error::{DelightError, Result};

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Vector width of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Blocking client for the OpenAI `/v1/embeddings` endpoint.
///
/// The whole distinct-phrase set goes out as a single request per run, so
/// one vector is fetched per unique phrase rather than per occurrence.
#[derive(Debug)]
pub struct OpenAiEmbedder {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    dimension: usize,
    endpoint: String,
}

impl OpenAiEmbedder {
    /// Create a client for the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            endpoint: EMBEDDINGS_URL.to_string(),
        }
    }

    /// Use a different embedding model. Callers switching models are
    /// responsible for pairing it with the right `dimension`.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Expected vector width, used for the zero-vector fallback.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Point at an alternate API endpoint (proxies, gateways).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingProvider for OpenAiEmbedder {
    fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f32>>> {
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": self.model,
            "input": phrases,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(DelightError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response.json()?;
        align_vectors(parsed, phrases.len())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Place returned vectors by their `index` field so the output is 1:1 with
/// the input order regardless of response ordering.
fn align_vectors(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    let got = response.data.len();
    if got != expected {
        return Err(DelightError::EmbeddingShape { expected, got });
    }

    let mut vectors: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in response.data {
        match vectors.get_mut(item.index) {
            Some(slot) if slot.is_none() => *slot = Some(item.embedding),
            // Out-of-range or duplicate index: the response does not cover
            // the input set.
            _ => return Err(DelightError::EmbeddingShape { expected, got }),
        }
    }

    Ok(vectors.into_iter().map(|v| v.expect("all slots filled")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(items: &[(usize, &[f32])]) -> EmbeddingResponse {
        EmbeddingResponse {
            data: items
                .iter()
                .map(|&(index, embedding)| EmbeddingItem {
                    index,
                    embedding: embedding.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_align_honors_index_order() {
        let aligned = align_vectors(response(&[(1, &[2.0]), (0, &[1.0])]), 2).unwrap();
        assert_eq!(aligned, vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_align_rejects_short_response() {
        let err = align_vectors(response(&[(0, &[1.0])]), 2).unwrap_err();
        assert!(matches!(
            err,
            DelightError::EmbeddingShape { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_align_rejects_duplicate_index() {
        let err = align_vectors(response(&[(0, &[1.0]), (0, &[2.0])]), 2).unwrap_err();
        assert!(matches!(err, DelightError::EmbeddingShape { .. }));
    }

    #[test]
    fn test_align_rejects_out_of_range_index() {
        let err = align_vectors(response(&[(0, &[1.0]), (5, &[2.0])]), 2).unwrap_err();
        assert!(matches!(err, DelightError::EmbeddingShape { .. }));
    }

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "object": "list",
            "data": [
                { "object": "embedding", "index": 0, "embedding": [0.1, 0.2] }
            ],
            "model": "text-embedding-3-small",
            "usage": { "prompt_tokens": 2, "total_tokens": 2 }
        }"#;
        let parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
    }
}
